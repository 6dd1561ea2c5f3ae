//! Fantasy Agent
//!
//! Loads the registry snapshot, runs one analysis command and prints the
//! report as JSON.

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use fantasy_agent_service::{initialize_logging, load_configuration, AgentService, Cli, CliHandler};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Load configuration
    let mut config = load_configuration(cli.config.as_deref())?;
    if let Some(data_file) = cli.data_file {
        config.data.data_file = data_file;
    }

    // Initialize logging
    initialize_logging(&config.logging)?;
    info!("Starting Fantasy Agent v{}", env!("CARGO_PKG_VERSION"));

    // Create service state
    let service = AgentService::new(config).await.context("Failed to initialize service")?;

    // Handle command
    CliHandler::new(service).handle_command(cli.command).await?;

    Ok(())
}
