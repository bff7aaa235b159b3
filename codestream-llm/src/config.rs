use std::env;
use std::sync::Arc;

use tracing::info;

use crate::providers::{AnthropicClient, OpenAiCompatClient};
use crate::routing::{ProviderKind, ProviderRegistry};

/// Credentials and endpoint overrides for the hosted providers, sourced from
/// the process environment.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    pub anthropic_api_key: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub groq_api_key: Option<String>,
    pub groq_base_url: Option<String>,
    pub cerebras_api_key: Option<String>,
    pub cerebras_base_url: Option<String>,
}

impl LlmConfig {
    /// Read provider credentials from the environment. Empty values count as
    /// unset.
    pub fn from_env() -> Self {
        Self {
            anthropic_api_key: read_env("ANTHROPIC_API_KEY"),
            anthropic_base_url: read_env("ANTHROPIC_BASE_URL"),
            openai_api_key: read_env("OPENAI_API_KEY"),
            openai_base_url: read_env("OPENAI_BASE_URL"),
            groq_api_key: read_env("GROQ_API_KEY"),
            groq_base_url: read_env("GROQ_BASE_URL"),
            cerebras_api_key: read_env("CEREBRAS_API_KEY"),
            cerebras_base_url: read_env("CEREBRAS_BASE_URL"),
        }
    }

    /// Build a registry containing a client for every provider with a
    /// configured API key. Providers without credentials stay unregistered
    /// and fail at resolve time.
    pub fn build_registry(&self) -> ProviderRegistry {
        let mut registry = ProviderRegistry::new();

        if let Some(key) = &self.anthropic_api_key {
            registry.register(
                ProviderKind::Anthropic,
                Arc::new(AnthropicClient::new(
                    key.clone(),
                    self.anthropic_base_url.clone(),
                )),
            );
        }
        if let Some(key) = &self.openai_api_key {
            registry.register(
                ProviderKind::OpenAi,
                Arc::new(OpenAiCompatClient::openai(
                    key.clone(),
                    self.openai_base_url.clone(),
                )),
            );
        }
        if let Some(key) = &self.groq_api_key {
            registry.register(
                ProviderKind::Groq,
                Arc::new(OpenAiCompatClient::groq(
                    key.clone(),
                    self.groq_base_url.clone(),
                )),
            );
        }
        if let Some(key) = &self.cerebras_api_key {
            registry.register(
                ProviderKind::Cerebras,
                Arc::new(OpenAiCompatClient::cerebras(
                    key.clone(),
                    self.cerebras_base_url.clone(),
                )),
            );
        }

        info!("providers configured: {}", registry.registered().join(", "));
        registry
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
