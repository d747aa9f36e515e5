//! mcp-cleanpage server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use cleanpage_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let missing = config.missing_optional();
    if !missing.is_empty() {
        tracing::warn!(missing = ?missing, "optional configuration not set");
    }

    tracing::info!(
        progressive = config.progressive,
        max_cache_age_ms = config.max_cache_age_ms,
        "Starting mcp-cleanpage server on stdio transport"
    );

    let handler = handler::CleanpageServer::new(config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
