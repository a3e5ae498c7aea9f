//! Tic-tac-toe oracle client - unified CLI.

#![warn(missing_docs)]

use anyhow::Result;
use clap::Parser;
use tictactoe_oracle::cli::{Cli, Command};
use tictactoe_oracle::{OracleConfig, console, simulate};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let config = load_config(&cli)?;
    info!(?config, "Configuration resolved");

    match cli.command {
        Command::Play => console::run_console(config).await,
        Command::Simulate { games } => simulate::run_simulation(config, games).await,
    }
}

/// Resolves configuration: file (if given), then CLI overrides.
fn load_config(cli: &Cli) -> Result<OracleConfig> {
    let mut config = match &cli.config {
        Some(path) => OracleConfig::from_file(path)?,
        None => OracleConfig::default(),
    };

    if let Some(base_url) = &cli.base_url {
        config.set_base_url(base_url.clone());
    }
    if let Some(protocol) = cli.protocol {
        config.set_protocol(protocol);
    }
    if let Some(model) = &cli.model {
        config.set_model(model.clone());
    }
    if let Some(metrics) = cli.metrics {
        config.set_metrics(metrics);
    }

    Ok(config)
}
