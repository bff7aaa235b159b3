use thiserror::Error;

/// Errors surfaced by provider clients and the registry.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The model routed to a provider that has no configured credentials.
    #[error("no credentials configured for provider {provider} (set {env_var})")]
    MissingProvider {
        provider: &'static str,
        env_var: &'static str,
    },

    /// The HTTP request to the provider could not be issued.
    #[error("request to {provider} failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider rejected the request before any stream was opened.
    #[error("{provider} returned status {status}: {message}")]
    Api {
        provider: &'static str,
        status: u16,
        message: String,
    },

    /// The provider reported an error mid-stream.
    #[error("{provider} stream error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    /// A stream payload could not be decoded.
    #[error("malformed stream payload from {provider}: {message}")]
    Decode {
        provider: &'static str,
        message: String,
    },

    /// The streaming transport failed.
    #[error("stream transport error from {provider}: {message}")]
    Transport {
        provider: &'static str,
        message: String,
    },
}
