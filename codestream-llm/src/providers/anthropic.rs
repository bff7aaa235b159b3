use async_stream::stream;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest_eventsource::{Event, RequestBuilderExt};
use serde::Deserialize;
use tracing::debug;

use crate::error::LlmError;
use crate::provider::{CompletionRequest, TokenStream, TokenStreamProvider};

pub const ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Streaming client for the Anthropic Messages API.
pub struct AnthropicClient {
    api_key: String,
    base_url: String,
    http: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: String, base_url: Option<String>) -> Self {
        let base_url = base_url.unwrap_or_else(|| ANTHROPIC_BASE_URL.to_string());
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: reqwest::Client::new(),
        }
    }
}

/// Stream frame payload. Anthropic tags every frame's JSON with a `type`
/// field; only `content_block_delta` carries text.
#[derive(Deserialize)]
struct AnthropicStreamEvent {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    delta: Option<AnthropicDelta>,
    #[serde(default)]
    error: Option<AnthropicApiError>,
}

#[derive(Deserialize)]
struct AnthropicDelta {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
struct AnthropicApiError {
    message: String,
}

#[async_trait]
impl TokenStreamProvider for AnthropicClient {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    async fn request_stream(&self, request: CompletionRequest) -> Result<TokenStream, LlmError> {
        let provider = self.name();
        let url = format!("{}/v1/messages", self.base_url);
        debug!("{} message stream: model={}", provider, request.model);

        let body = serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens,
            "temperature": request.temperature,
            "stream": true,
            "system": request.system_prompt,
            "messages": [
                { "role": "user", "content": request.prompt },
            ],
        });

        let mut source = self
            .http
            .post(url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
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
                        let frame = match serde_json::from_str::<AnthropicStreamEvent>(&message.data) {
                            Ok(frame) => frame,
                            Err(e) => {
                                source.close();
                                yield Err(LlmError::Decode {
                                    provider,
                                    message: e.to_string(),
                                });
                                break;
                            }
                        };
                        match frame.kind.as_str() {
                            "content_block_delta" => {
                                let text = frame.delta.and_then(|delta| delta.text);
                                if let Some(text) = text {
                                    if !text.is_empty() {
                                        yield Ok(text);
                                    }
                                }
                            }
                            "message_stop" => {
                                source.close();
                                break;
                            }
                            "error" => {
                                let message = frame
                                    .error
                                    .map(|e| e.message)
                                    .unwrap_or_else(|| "unknown provider error".to_string());
                                source.close();
                                yield Err(LlmError::Provider { provider, message });
                                break;
                            }
                            // message_start, content_block_start/stop,
                            // message_delta, ping
                            _ => {}
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
