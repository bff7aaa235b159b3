use std::sync::Arc;

use axum::{routing::post, Router};
use tower_http::cors::CorsLayer;
use tracing::info;

use codestream_llm::ProviderRegistry;

use crate::apis;
use crate::conversation::{ConversationStore, InMemoryConversationStore};

/// Configuration for the HTTP server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Server bind address (e.g., "127.0.0.1:8080")
    pub address: String,
    /// Whether to install the in-process conversation history.
    pub conversation_tracking: bool,
}

impl ServerConfig {
    /// Create a new server config with the given address and conversation
    /// tracking enabled.
    pub fn new(address: String) -> Self {
        Self {
            address,
            conversation_tracking: true,
        }
    }

    /// Set whether the in-process conversation history is installed.
    pub fn with_conversation_tracking(mut self, enabled: bool) -> Self {
        self.conversation_tracking = enabled;
        self
    }
}

/// Server state shared by request handlers.
#[derive(Clone)]
pub struct ServerState {
    pub providers: Arc<ProviderRegistry>,
    /// Optionally absent; requests complete without history when `None`.
    pub conversation: Option<Arc<dyn ConversationStore>>,
}

/// Build the application router.
pub fn app(state: ServerState) -> Router {
    Router::new()
        .route("/api/generate", post(apis::generate::handle_generate))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server with SSE streaming
pub async fn start_server(
    config: ServerConfig,
    providers: ProviderRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let registered = providers.registered();
    println!("✓ Provider registry initialized");
    if registered.is_empty() {
        println!("  Providers: \x1b[1mnone\x1b[0m (set provider API keys in the environment)");
    } else {
        println!("  Providers: \x1b[1m{}\x1b[0m", registered.join(", "));
    }
    println!(
        "  Conversation history: \x1b[1m{}\x1b[0m",
        if config.conversation_tracking { "on" } else { "off" }
    );
    println!();

    let conversation: Option<Arc<dyn ConversationStore>> = if config.conversation_tracking {
        Some(Arc::new(InMemoryConversationStore::new()))
    } else {
        None
    };

    let state = ServerState {
        providers: Arc::new(providers),
        conversation,
    };

    let router = app(state);

    let listener = tokio::net::TcpListener::bind(&config.address).await?;

    println!("Server starting on \x1b[1mhttp://{}\x1b[0m", config.address);
    println!("\nAvailable endpoints:");
    println!("  \x1b[1mPOST /api/generate\x1b[0m - stream a code generation (SSE)");
    println!("\nPress Ctrl+C to stop\n");

    info!("HTTP server listening on {}", config.address);

    axum::serve(listener, router).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn bare_state() -> ServerState {
        ServerState {
            providers: Arc::new(ProviderRegistry::new()),
            conversation: None,
        }
    }

    fn generate_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn malformed_json_is_a_400_with_an_error_envelope() {
        let response = app(bare_state())
            .oneshot(generate_request("{not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(value["error"]["type"], "invalid_request");
    }

    #[tokio::test]
    async fn missing_prompt_is_a_400() {
        let response = app(bare_state())
            .oneshot(generate_request("{}"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
