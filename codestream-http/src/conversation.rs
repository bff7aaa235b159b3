use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// What kind of exchange produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExchangeKind {
    Generate,
    Edit,
}

/// Package findings attached to both sides of an exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageMetadata {
    pub kind: ExchangeKind,
    pub packages: Vec<String>,
}

/// One appended conversation record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: MessageMetadata,
}

impl MessageRecord {
    pub fn new(role: MessageRole, content: String, metadata: MessageMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            content,
            timestamp: Utc::now(),
            metadata,
        }
    }
}

/// Append-only view of the shared conversation history.
///
/// The relay only appends; creation and teardown of the underlying history
/// are owned by the embedding process. Injected through server state, never
/// reached through a global.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn append_message(&self, record: MessageRecord);
}

#[derive(Debug, Default)]
struct ConversationState {
    messages: Vec<MessageRecord>,
    last_updated: Option<DateTime<Utc>>,
}

/// Conversation history held in process memory.
///
/// Appends from concurrent requests may interleave; ordering is only
/// guaranteed within one request's pair of appends.
#[derive(Default)]
pub struct InMemoryConversationStore {
    state: Mutex<ConversationState>,
}

impl InMemoryConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the appended records, in order.
    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.state.lock().await.messages.clone()
    }

    pub async fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.state.lock().await.last_updated
    }
}

#[async_trait]
impl ConversationStore for InMemoryConversationStore {
    async fn append_message(&self, record: MessageRecord) {
        let mut state = self.state.lock().await;
        state.last_updated = Some(record.timestamp);
        state.messages.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn appends_preserve_order_and_touch_the_timestamp() {
        let store = InMemoryConversationStore::new();
        assert!(store.last_updated().await.is_none());

        let metadata = MessageMetadata {
            kind: ExchangeKind::Generate,
            packages: vec![],
        };
        store
            .append_message(MessageRecord::new(
                MessageRole::User,
                "make a todo app".to_string(),
                metadata.clone(),
            ))
            .await;
        store
            .append_message(MessageRecord::new(
                MessageRole::Assistant,
                "done".to_string(),
                metadata,
            ))
            .await;

        let messages = store.messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(store.last_updated().await, Some(messages[1].timestamp));
    }
}
