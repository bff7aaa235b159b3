use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::LlmError;
use crate::provider::{CompletionRequest, TokenStream, TokenStreamProvider};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const CEREBRAS_BASE_URL: &str = "https://api.cerebras.ai/v1";

/// Chat-completions client for OpenAI-compatible providers.
///
/// OpenAI, Groq and Cerebras all speak the same `/chat/completions` wire
/// format and differ only in base URL and credentials, so one client covers
/// all three.
pub struct OpenAiCompatClient {
    provider: &'static str,
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl OpenAiCompatClient {
    pub fn openai(api_key: String, base_url: Option<String>) -> Self {
        Self::new("openai", api_key, base_url, OPENAI_BASE_URL)
    }

    pub fn groq(api_key: String, base_url: Option<String>) -> Self {
        Self::new("groq", api_key, base_url, GROQ_BASE_URL)
    }

    pub fn cerebras(api_key: String, base_url: Option<String>) -> Self {
        Self::new("cerebras", api_key, base_url, CEREBRAS_BASE_URL)
    }

    fn new(
        provider: &'static str,
        api_key: String,
        base_url: Option<String>,
        default_base_url: &str,
    ) -> Self {
        let base_url = base_url.unwrap_or_else(|| default_base_url.to_string());
        Self {
            provider,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct ChatChunk {
    #[serde(default)]
    choices: Vec<ChunkChoice>,
}

#[derive(Deserialize)]
struct ChunkChoice {
    #[serde(default)]
    delta: ChunkDelta,
}

#[derive(Deserialize, Default)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl TokenStreamProvider for OpenAiCompatClient {
    fn name(&self) -> &'static str {
        self.provider
    }

    async fn request_stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        let provider = self.provider;
        let url = format!("{}/chat/completions", self.base_url);
        debug!("{} chat completion: model={}", provider, request.model);

        let body = serde_json::json!({
            "model": request.model,
            "messages": [
                { "role": "system", "content": request.system_prompt },
                { "role": "user", "content": request.prompt },
            ],
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
            "stream": true,
        });

        let mut source = self
            .http
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .eventsource()
            .map_err(|e| LlmError::Transport {
                provider,
                message: e.to_string(),
            })?;

        let stream = stream! {
            while let Some(event) = source.next().await {
                match event {
                    Ok(Event::Open) => {}
                    Ok(Event::Message(message)) => {
                        if message.data.trim() == "[DONE]" {
                            source.close();
                            break;
                        }
                        match serde_json::from_str::<ChatChunk>(&message.data) {
                            Ok(chunk) => {
                                let content = chunk
                                    .choices
                                    .into_iter()
                                    .next()
                                    .and_then(|choice| choice.delta.content);
                                if let Some(content) = content {
                                    if !content.is_empty() {
                                        yield Ok(content);
                                    }
                                }
                            }
                            Err(e) => {
                                source.close();
                                yield Err(LlmError::Decode {
                                    provider,
                                    message: e.to_string(),
                                });
                                break;
                            }
                        }
                    }
                    Err(reqwest_eventsource::Error::StreamEnded) => break,
                    Err(reqwest_eventsource::Error::InvalidStatusCode(status, response)) => {
                        let message = response.text().await.unwrap_or_default();
                        source.close();
                        yield Err(LlmError::Api {
                            provider,
                            status: status.as_u16(),
                            message,
                        });
                        break;
                    }
                    Err(e) => {
                        source.close();
                        yield Err(LlmError::Transport {
                            provider,
                            message: e.to_string(),
                        });
                        break;
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}
