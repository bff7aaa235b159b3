use std::sync::Arc;

use async_stream::stream;
use futures::{Stream, StreamExt};
use tracing::{error, info};

use codestream_llm::{CompletionRequest, TokenStreamProvider};

use crate::conversation::{
    ConversationStore, ExchangeKind, MessageMetadata, MessageRecord, MessageRole,
};
use crate::events::StreamEvent;
use crate::scanner::PackageScanner;

/// Everything the relay needs to run one generation exchange.
pub struct RelayRequest {
    pub provider: Arc<dyn TokenStreamProvider>,
    pub completion: CompletionRequest,
    /// The caller's prompt, recorded verbatim in the conversation.
    pub original_prompt: String,
    pub is_edit: bool,
    pub request_id: String,
}

/// Relay a provider token stream as generation events.
///
/// Per chunk, strictly in arrival order: accumulate the response, emit
/// `text` first so the client never waits on the scan, then scan for
/// package tags and emit one `package` event per newly discovered name.
/// Exhaustion emits a single `complete` event and then appends the exchange
/// to the conversation store when one is present (best-effort, no failure
/// path of its own). Any provider failure emits a single `error` event and
/// ends the stream.
pub fn relay_stream(
    request: RelayRequest,
    conversation: Option<Arc<dyn ConversationStore>>,
) -> impl Stream<Item = StreamEvent> {
    stream! {
        let RelayRequest {
            provider,
            completion,
            original_prompt,
            is_edit,
            request_id,
        } = request;

        let mut tokens = match provider.request_stream(completion).await {
            Ok(tokens) => tokens,
            Err(e) => {
                error!("[{}] {} stream request failed: {}", request_id, provider.name(), e);
                yield StreamEvent::Error { error: e.to_string() };
                return;
            }
        };

        let mut response = String::new();
        let mut scanner = PackageScanner::new();

        while let Some(chunk) = tokens.next().await {
            match chunk {
                Ok(content) => {
                    response.push_str(&content);
                    yield StreamEvent::Text { content: content.clone() };
                    for name in scanner.scan(&content) {
                        yield StreamEvent::Package {
                            message: format!("Detected dependency: {}", name),
                            name,
                        };
                    }
                }
                Err(e) => {
                    error!("[{}] {} stream failed: {}", request_id, provider.name(), e);
                    yield StreamEvent::Error { error: e.to_string() };
                    return;
                }
            }
        }

        let packages = scanner.packages().to_vec();
        info!(
            "[{}] stream complete: {} bytes, {} package(s)",
            request_id,
            response.len(),
            packages.len()
        );

        yield StreamEvent::Complete {
            response: response.clone(),
            packages: packages.clone(),
            message: format!("Generation complete ({} package(s) detected)", packages.len()),
        };

        if let Some(store) = conversation {
            let metadata = MessageMetadata {
                kind: if is_edit { ExchangeKind::Edit } else { ExchangeKind::Generate },
                packages,
            };
            store
                .append_message(MessageRecord::new(
                    MessageRole::User,
                    original_prompt,
                    metadata.clone(),
                ))
                .await;
            store
                .append_message(MessageRecord::new(MessageRole::Assistant, response, metadata))
                .await;
        }
    }
}
