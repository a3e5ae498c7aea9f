//! Tic-tac-toe oracle client library.
//!
//! A client-side game loop that, after every move, asks an external
//! prediction service to classify the board, reconciles the prediction
//! against locally computed ground truth, and keeps running accuracy
//! metrics.
//!
//! # Architecture
//!
//! - **game**: board representation and the authoritative state classifier
//! - **oracle**: async HTTP boundary to the prediction service
//! - **metrics**: local or remote accuracy accounting
//! - **session / driver**: the turn state machine and its orchestration
//! - **console / simulate**: thin frontends over the driver's channels

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod bot;
mod config;
mod driver;
mod game;
mod metrics;
mod oracle;
mod session;

// Frontends and CLI
pub mod cli;
pub mod console;
pub mod simulate;

// Crate-level exports - board and classifier
pub use game::{Board, Cell, GameLabel, Mark, WIN_LINES, check_winner, classify, has_threat};

// Crate-level exports - oracle boundary
pub use oracle::{
    GroundTruthReport, MetricsSnapshot, OracleError, PredictRequest, PredictResponse,
    PredictionClient, Protocol,
};

// Crate-level exports - metrics
pub use metrics::{MetricsAggregator, MetricsMode, MetricsView};

// Crate-level exports - session and driver
pub use bot::RandomBot;
pub use driver::{EvaluationReport, GameCommand, GameEvent, GameLoop};
pub use session::{GameSession, MoveRejected, Phase};

// Crate-level exports - configuration
pub use config::{ConfigError, OracleConfig, ProtocolKind};
