pub mod apis;
pub mod conversation;
pub mod error;
pub mod events;
pub mod http;
pub mod prompt;
pub mod relay;
pub mod scanner;

pub use conversation::{
    ConversationStore, ExchangeKind, InMemoryConversationStore, MessageMetadata, MessageRecord,
    MessageRole,
};
pub use error::{ApiJson, ErrorResponse};
pub use events::StreamEvent;
pub use http::{app, start_server, ServerConfig, ServerState};
pub use relay::{relay_stream, RelayRequest};
pub use scanner::PackageScanner;
