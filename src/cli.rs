//! Command-line interface.

use crate::config::ProtocolKind;
use crate::metrics::MetricsMode;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tic-tac-toe client that scores a remote board-state classifier.
#[derive(Parser, Debug)]
#[command(name = "tictactoe_oracle")]
#[command(about = "Play tic-tac-toe while an ML oracle classifies every board", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to a TOML config file.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Oracle base URL (overrides config file).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Oracle protocol variant (overrides config file).
    #[arg(long, value_enum)]
    pub protocol: Option<ProtocolKind>,

    /// Model name for the per-model protocol: mlp, knn or arvore.
    #[arg(long)]
    pub model: Option<String>,

    /// Metrics accounting mode (overrides config file).
    #[arg(long, value_enum)]
    pub metrics: Option<MetricsMode>,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play interactively in the console.
    Play,

    /// Run headless bot-vs-bot games against the oracle.
    Simulate {
        /// Number of games to play.
        #[arg(short, long, default_value = "10")]
        games: u32,
    },
}
