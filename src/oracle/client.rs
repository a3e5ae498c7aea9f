//! HTTP client for the prediction oracle.

use super::protocol::{
    GroundTruthReport, MetricsSnapshot, PredictRequest, PredictResponse, Protocol,
};
use crate::game::{Board, GameLabel, Mark};
use derive_more::{Display, Error};
use tracing::{debug, info, instrument, warn};

/// Failure at the oracle boundary.
///
/// Transport problems (network, DNS, timeouts) and protocol problems
/// (non-success status, malformed payload) are distinct variants, but the
/// game loop treats every `Err` the same way: oracle unavailable, fall back
/// to local-only display. No call is ever retried.
#[derive(Debug, Clone, Display, Error)]
pub enum OracleError {
    /// The request never produced a usable HTTP response.
    #[display("oracle transport failure: {message}")]
    Transport {
        /// Underlying error description.
        message: String,
    },
    /// The oracle answered, but not with a valid response.
    #[display("oracle protocol failure: {message}")]
    Protocol {
        /// What was wrong with the response.
        message: String,
    },
}

impl OracleError {
    fn transport(err: impl std::fmt::Display) -> Self {
        OracleError::Transport {
            message: err.to_string(),
        }
    }

    fn protocol(message: impl Into<String>) -> Self {
        OracleError::Protocol {
            message: message.into(),
        }
    }
}

/// Asynchronous client for the board-state prediction oracle.
///
/// Owns request serialization and correlation; every method issues exactly
/// one HTTP call.
#[derive(Debug, Clone)]
pub struct PredictionClient {
    base_url: String,
    protocol: Protocol,
    client: reqwest::Client,
}

impl PredictionClient {
    /// Creates a client for the given oracle endpoint.
    pub fn new(base_url: impl Into<String>, protocol: Protocol) -> Self {
        let base_url = base_url.into();
        info!(base_url = %base_url, protocol = ?protocol, "Creating prediction client");
        Self {
            base_url,
            protocol,
            client: reqwest::Client::new(),
        }
    }

    /// Returns the protocol variant this client speaks.
    pub fn protocol(&self) -> &Protocol {
        &self.protocol
    }

    /// Returns a client speaking to the same oracle with a different model.
    ///
    /// Only meaningful for the per-model protocol; the correlated endpoint
    /// has no model route segment and is returned unchanged.
    pub fn with_model(&self, model: impl Into<String>) -> Self {
        let protocol = match &self.protocol {
            Protocol::Correlated => Protocol::Correlated,
            Protocol::PerModel { .. } => Protocol::PerModel {
                model: model.into(),
            },
        };
        Self {
            base_url: self.base_url.clone(),
            protocol,
            client: self.client.clone(),
        }
    }

    /// Asks the oracle to classify a board snapshot.
    ///
    /// One attempt, no retry. Any failure collapses into [`OracleError`];
    /// the caller falls back to local-only display.
    #[instrument(skip(self, board), fields(turn = %turn))]
    pub async fn classify_state(
        &self,
        board: &Board,
        turn: Mark,
    ) -> Result<PredictResponse, OracleError> {
        let url = self.protocol.predict_url(&self.base_url);
        let request = PredictRequest {
            board: board.clone(),
            turn,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, url = %url, "Prediction request failed to send");
                OracleError::transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = %status, url = %url, "Oracle returned non-success status");
            return Err(OracleError::protocol(format!("unexpected status {status}")));
        }

        let parsed: PredictResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse prediction response");
            OracleError::protocol(format!("invalid payload: {e}"))
        })?;

        debug!(
            model = %parsed.model_name,
            prediction = %parsed.prediction,
            request_id = ?parsed.request_id,
            "Received prediction"
        );
        Ok(parsed)
    }

    /// Reports the locally computed ground truth for a scored prediction.
    ///
    /// Best-effort notify: the caller is permitted to ignore the result,
    /// and a failure here must never affect game flow.
    #[instrument(skip(self), fields(request_id = %request_id, truth = %ground_truth))]
    pub async fn report_ground_truth(
        &self,
        request_id: &str,
        ground_truth: GameLabel,
        correct: bool,
    ) -> Result<(), OracleError> {
        let report = GroundTruthReport {
            request_id: request_id.to_string(),
            ground_truth,
            correct,
        };

        let response = self
            .client
            .post(format!("{}/log-ground-truth", self.base_url))
            .json(&report)
            .send()
            .await
            .map_err(OracleError::transport)?;

        if !response.status().is_success() {
            return Err(OracleError::protocol(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        debug!("Ground truth logged");
        Ok(())
    }

    /// Fetches the oracle's pre-aggregated metrics snapshot.
    #[instrument(skip(self))]
    pub async fn fetch_metrics(&self) -> Result<MetricsSnapshot, OracleError> {
        let response = self
            .client
            .get(format!("{}/metrics", self.base_url))
            .send()
            .await
            .map_err(OracleError::transport)?;

        if !response.status().is_success() {
            return Err(OracleError::protocol(format!(
                "unexpected status {}",
                response.status()
            )));
        }

        let snapshot: MetricsSnapshot = response
            .json()
            .await
            .map_err(|e| OracleError::protocol(format!("invalid payload: {e}")))?;

        debug!(?snapshot, "Fetched metrics snapshot");
        Ok(snapshot)
    }

    /// Pings the oracle. Used by frontends for an online/offline badge.
    #[instrument(skip(self))]
    pub async fn health(&self) -> bool {
        self.fetch_metrics().await.is_ok()
    }
}
