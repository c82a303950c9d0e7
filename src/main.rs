//! zendesk-mcp - MCP server for Zendesk Support
//!
//! This binary runs as an MCP server using stdio transport.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `ZENDESK_SUBDOMAIN`: Subdomain of your Zendesk account
//! - `ZENDESK_EMAIL`: Email of the agent owning the API token
//! - `ZENDESK_API_TOKEN`: Zendesk API token
//!
//! # Usage
//!
//! ```bash
//! ZENDESK_SUBDOMAIN=acme ZENDESK_EMAIL=agent@acme.com ZENDESK_API_TOKEN=xxx ./zendesk-mcp
//! ```

use anyhow::{Context, Result};
use rmcp::{transport::stdio, ServiceExt};
use tracing_subscriber::{fmt, EnvFilter};

use zendesk_mcp::{config, server, zendesk_client};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (ignore errors if not found)
    dotenvy::dotenv().ok();

    // stdout is reserved for MCP JSON-RPC messages
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("zendesk_mcp=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    tracing::info!("Starting zendesk-mcp v{}", env!("CARGO_PKG_VERSION"));

    let config = config::Config::from_env().context("Failed to load configuration")?;

    tracing::debug!(base_url = %config.base_url(), "Configuration loaded");

    let client =
        zendesk_client::ZendeskClient::new(&config).context("Failed to create Zendesk client")?;

    tracing::info!("Testing connection to Zendesk...");
    if let Err(e) = client.test_connection().await {
        tracing::error!(error = %e, "Connection test failed");
        // Keep serving; Zendesk may become reachable later
        tracing::warn!(
            "Server will start but may not be able to reach Zendesk. \
             Check configuration and network connectivity."
        );
    }

    let server = server::ZendeskServer::new(client);

    tracing::info!("Server initialized, starting stdio transport");

    let service = server
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("serving error: {:?}", e);
        })
        .context("Failed to start server")?;

    tracing::info!("Server running, waiting for requests");

    service
        .waiting()
        .await
        .context("Server error during operation")?;

    tracing::info!("Server shutting down");

    Ok(())
}
