//! Oracle wire contract: endpoints and payload schemas.

use crate::game::{Board, GameLabel, Mark};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Which oracle endpoint family the client speaks.
///
/// The two deployed services expose different routes; the choice is
/// configuration, not separate game loops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Protocol {
    /// `POST /predict-state`: responses carry a correlation id, enabling
    /// ground-truth reporting and server-side metrics.
    Correlated,
    /// `POST /predict/{model}`: model is chosen per request, no correlation
    /// id, no ground-truth reporting.
    PerModel {
        /// Model route segment ("mlp", "knn", "arvore").
        model: String,
    },
}

impl Protocol {
    /// URL for the classification call.
    pub fn predict_url(&self, base_url: &str) -> String {
        match self {
            Protocol::Correlated => format!("{base_url}/predict-state"),
            Protocol::PerModel { model } => format!("{base_url}/predict/{model}"),
        }
    }

    /// Whether responses from this variant can carry a correlation id.
    pub fn supports_correlation(&self) -> bool {
        matches!(self, Protocol::Correlated)
    }
}

/// Classification request: a value snapshot of board and turn.
///
/// Taken at call time, so later board mutation cannot leak into an
/// in-flight request.
#[derive(Debug, Clone, Serialize)]
pub struct PredictRequest {
    /// Board snapshot as 9 wire tokens.
    pub board: Board,
    /// Side to move.
    pub turn: Mark,
}

/// Oracle classification response.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictResponse {
    /// Name of the model that produced the prediction.
    pub model_name: String,
    /// Predicted label; unknown strings are a protocol failure.
    pub prediction: GameLabel,
    /// Per-label scores. Opaque to the client.
    pub probs: HashMap<String, f64>,
    /// Correlation id for a later ground-truth report. Only the correlated
    /// endpoint returns one, and even there it is not guaranteed.
    #[serde(default)]
    pub request_id: Option<String>,
}

/// Ground-truth report for a scored prediction. Fire-and-forget.
#[derive(Debug, Clone, Serialize)]
pub struct GroundTruthReport {
    /// Correlation id from the prediction response.
    pub request_id: String,
    /// Locally computed authoritative label.
    pub ground_truth: GameLabel,
    /// Whether the prediction matched the ground truth.
    pub correct: bool,
}

/// Pre-aggregated accuracy snapshot served by `GET /metrics`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Accuracy in [0, 1].
    pub acc: f64,
    /// Total scored predictions.
    pub n: u64,
    /// Correct predictions.
    pub hits: u64,
    /// Incorrect predictions.
    pub miss: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_predict_request_wire_shape() {
        let request = PredictRequest {
            board: Board::new(),
            turn: Mark::X,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["turn"], "x");
        assert_eq!(json["board"][0], "b");
        assert_eq!(json["board"].as_array().unwrap().len(), 9);
    }

    #[test]
    fn test_predict_response_missing_prediction_is_error() {
        let raw = r#"{"model_name": "mlp_v3", "probs": {}}"#;
        assert!(serde_json::from_str::<PredictResponse>(raw).is_err());
    }

    #[test]
    fn test_predict_response_request_id_optional() {
        let raw = r#"{"model_name": "MLP", "prediction": "Tem jogo", "probs": {"Tem jogo": 0.9}}"#;
        let response: PredictResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.prediction, GameLabel::InProgress);
        assert!(response.request_id.is_none());
    }

    #[test]
    fn test_predict_urls() {
        let base = "http://127.0.0.1:8000";
        assert_eq!(
            Protocol::Correlated.predict_url(base),
            "http://127.0.0.1:8000/predict-state"
        );
        let per_model = Protocol::PerModel {
            model: "knn".to_string(),
        };
        assert_eq!(
            per_model.predict_url(base),
            "http://127.0.0.1:8000/predict/knn"
        );
        assert!(!per_model.supports_correlation());
    }
}
