//! mcp-search server entry point.
//!
//! This is the main binary that boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use std::sync::Arc;

use anyhow::Result;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use searchcache_client::{SearchError, TavilyClient};
use searchcache_core::{AppConfig, CacheStore, SqliteBackend};
use tracing_subscriber::EnvFilter;

mod error;
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

    tracing::info!(db_path = %config.db_path.display(), "Starting mcp-search server on stdio transport");

    let backend = SqliteBackend::open(&config.db_path).await?;
    let store = Arc::new(CacheStore::from_config(backend, &config));

    let client = match TavilyClient::from_config(&config) {
        Ok(client) => Some(client),
        Err(SearchError::MissingApiKey) => {
            tracing::warn!("no API key configured: web_search answers from the cache only");
            None
        }
        Err(e) => return Err(e.into()),
    };

    let handler = handler::McpSearchServer::new(store, client, config);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
