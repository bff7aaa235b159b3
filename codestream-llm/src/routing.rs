use std::collections::HashMap;
use std::sync::Arc;

use crate::error::LlmError;
use crate::provider::TokenStreamProvider;

/// Hosted provider families the relay can route to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Groq,
    Cerebras,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::OpenAi => "openai",
            ProviderKind::Groq => "groq",
            ProviderKind::Cerebras => "cerebras",
        }
    }

    /// Environment variable holding this provider's API key.
    pub fn env_key(&self) -> &'static str {
        match self {
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::Cerebras => "CEREBRAS_API_KEY",
        }
    }
}

/// A resolved route: which provider serves a request, and under what model
/// name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoute {
    pub provider: ProviderKind,
    pub model: String,
}

/// Map a model identifier to a provider route.
///
/// Prefix rules, evaluated in order. `openai/` identifiers containing
/// `gpt-oss` are served by Groq under the fully qualified identifier; the
/// prefix is deliberately not stripped, since Groq lists that model family
/// under its qualified name. Unrecognized identifiers fall through to
/// Cerebras verbatim.
pub fn route_model(model_id: &str) -> ModelRoute {
    if let Some(name) = model_id.strip_prefix("anthropic/") {
        return ModelRoute {
            provider: ProviderKind::Anthropic,
            model: name.to_string(),
        };
    }
    if let Some(name) = model_id.strip_prefix("openai/") {
        if model_id.contains("gpt-oss") {
            return ModelRoute {
                provider: ProviderKind::Groq,
                model: model_id.to_string(),
            };
        }
        return ModelRoute {
            provider: ProviderKind::OpenAi,
            model: name.to_string(),
        };
    }
    if let Some(name) = model_id.strip_prefix("cerebras/") {
        return ModelRoute {
            provider: ProviderKind::Cerebras,
            model: name.to_string(),
        };
    }
    ModelRoute {
        provider: ProviderKind::Cerebras,
        model: model_id.to_string(),
    }
}

/// Registry of constructed provider clients, keyed by provider family.
///
/// Providers are added by registering an entry, never by editing dispatch
/// logic. A model that routes to an unregistered provider fails at resolve
/// time.
#[derive(Default)]
pub struct ProviderRegistry {
    clients: HashMap<ProviderKind, Arc<dyn TokenStreamProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            clients: HashMap::new(),
        }
    }

    pub fn register(&mut self, kind: ProviderKind, client: Arc<dyn TokenStreamProvider>) {
        self.clients.insert(kind, client);
    }

    pub fn contains(&self, kind: ProviderKind) -> bool {
        self.clients.contains_key(&kind)
    }

    /// Names of the registered providers, sorted for stable display.
    pub fn registered(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.clients.keys().map(|k| k.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a model identifier to a registered client and the model name
    /// to pass through to it.
    pub fn resolve(
        &self,
        model_id: &str,
    ) -> Result<(Arc<dyn TokenStreamProvider>, String), LlmError> {
        let route = route_model(model_id);
        let client =
            self.clients
                .get(&route.provider)
                .cloned()
                .ok_or(LlmError::MissingProvider {
                    provider: route.provider.as_str(),
                    env_var: route.provider.env_key(),
                })?;
        Ok((client, route.model))
    }
}
