//! Binary entry point for the Postman MCP server.

use anyhow::{Context, Result};
use postman_mcp::tools::{self, ToolRegistry};
use postman_mcp::McpServer;
use postman_mcp_client::PostmanClient;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the protocol; all diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let api_key = std::env::var("POSTMAN_API_KEY")
        .context("POSTMAN_API_KEY environment variable is required")?;

    let mut builder = PostmanClient::builder().api_key(api_key);
    if let Ok(base_url) = std::env::var("POSTMAN_API_BASE_URL") {
        builder = builder.base_url(base_url);
    }
    let client = builder.build().context("failed to build Postman client")?;

    let mut registry = ToolRegistry::new();
    tools::workspaces::register_tools(&mut registry, &client);
    tools::environments::register_tools(&mut registry, &client);
    tools::collections::register_tools(&mut registry, &client);
    tools::users::register_tools(&mut registry, &client);
    tools::sdk::register_tools(&mut registry);
    info!(tools = registry.len(), "registered tool catalog");

    let server = McpServer::new(registry);
    server.run().await.context("stdio server loop failed")?;

    Ok(())
}
