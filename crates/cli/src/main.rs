//! web-search entry point.
//!
//! Command output goes to stdout; logs go to stderr, filtered by RUST_LOG
//! (default: warn).

use anyhow::Result;
use clap::Parser;
use searchcache_cli::{cli::Cli, commands};
use searchcache_core::AppConfig;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load()?;

    let mut stdout = std::io::stdout().lock();
    commands::run(cli.command, &config, &mut stdout).await
}
