//! API Key Rotation CLI
//!
//! This is the main entry point for the CLI application.

mod backends;
mod cli;
mod config;
mod error;
mod rotation;

use anyhow::Result;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Parse CLI arguments
    use clap::Parser;
    let cli = cli::Cli::parse();

    // An explicit --env-file is loaded by the run itself
    if cli.env_file.is_none() {
        if let Err(e) = dotenvy::dotenv() {
            if !e.not_found() {
                warn!("Failed to load .env file: {}", e);
            }
        }
    }

    cli::execute(cli).await
}
