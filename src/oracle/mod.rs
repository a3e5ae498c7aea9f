//! Asynchronous boundary to the external prediction oracle.

mod client;
mod protocol;

pub use client::{OracleError, PredictionClient};
pub use protocol::{GroundTruthReport, MetricsSnapshot, PredictRequest, PredictResponse, Protocol};
