use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::LlmError;

/// An asynchronous sequence of text fragments produced incrementally by a
/// model provider.
pub type TokenStream = BoxStream<'static, Result<String, LlmError>>;

/// One completion call as handed to a provider client.
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    /// Model name in the form the provider expects.
    pub model: String,
    pub system_prompt: String,
    pub prompt: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// Unified streaming interface over the hosted model providers.
#[async_trait]
pub trait TokenStreamProvider: Send + Sync {
    /// Provider name used in logs and error messages.
    fn name(&self) -> &'static str;

    /// Open a token stream for the given completion request.
    async fn request_stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError>;
}
