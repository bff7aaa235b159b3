mod anthropic;
mod openai_compat;

pub use anthropic::AnthropicClient;
pub use openai_compat::OpenAiCompatClient;
