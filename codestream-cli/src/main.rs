use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use codestream_http::{start_server, ServerConfig};
use codestream_llm::LlmConfig;

/// Streaming relay for LLM code generation.
///
/// Provider credentials are read from the environment: ANTHROPIC_API_KEY,
/// OPENAI_API_KEY, GROQ_API_KEY, CEREBRAS_API_KEY (plus optional
/// *_BASE_URL overrides).
#[derive(Parser, Debug)]
#[command(name = "codestream", version, about)]
struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1:8080")]
    address: String,

    /// Disable the in-process conversation history.
    #[arg(long)]
    no_history: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let registry = LlmConfig::from_env().build_registry();

    let config = ServerConfig::new(cli.address).with_conversation_tracking(!cli.no_history);

    start_server(config, registry)
        .await
        .map_err(|e| anyhow::anyhow!("server error: {e}"))?;

    Ok(())
}
