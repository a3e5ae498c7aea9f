//! Prediction accuracy accounting.

use crate::game::GameLabel;
use crate::oracle::MetricsSnapshot;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Where accuracy numbers come from.
///
/// The two modes must not be mixed within a session: local accumulation on
/// top of remote snapshots double-counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MetricsMode {
    /// Count hits locally from (prediction, ground truth) pairs.
    Local,
    /// Cache the oracle's own `GET /metrics` snapshot verbatim.
    Remote,
}

/// Display-ready view of the current metrics.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricsView {
    /// Correct predictions.
    pub hits: u64,
    /// Total scored predictions.
    pub total: u64,
    /// Accuracy in [0, 1]; 0 when no predictions have been scored.
    pub accuracy: f64,
}

/// Accumulates prediction outcomes, or caches the oracle's snapshot.
///
/// Counters survive board resets; only an explicit session reset clears
/// them.
#[derive(Debug, Clone)]
pub enum MetricsAggregator {
    /// Local hit/total accounting.
    Local {
        /// Total scored predictions.
        total: u64,
        /// Correct predictions.
        hits: u64,
    },
    /// Verbatim cache of the latest remote snapshot.
    Remote {
        /// Last snapshot fetched, if any round has completed.
        snapshot: Option<MetricsSnapshot>,
    },
}

impl MetricsAggregator {
    /// Creates an aggregator for the given mode.
    pub fn new(mode: MetricsMode) -> Self {
        match mode {
            MetricsMode::Local => MetricsAggregator::Local { total: 0, hits: 0 },
            MetricsMode::Remote => MetricsAggregator::Remote { snapshot: None },
        }
    }

    /// The mode this aggregator runs in.
    pub fn mode(&self) -> MetricsMode {
        match self {
            MetricsAggregator::Local { .. } => MetricsMode::Local,
            MetricsAggregator::Remote { .. } => MetricsMode::Remote,
        }
    }

    /// Scores one resolved prediction against its ground truth (local mode).
    ///
    /// Increments the total always and hits on a match. No-op in remote
    /// mode, where the oracle does its own accounting.
    #[instrument(skip(self))]
    pub fn record(&mut self, prediction: GameLabel, truth: GameLabel) {
        match self {
            MetricsAggregator::Local { total, hits } => {
                *total += 1;
                if prediction == truth {
                    *hits += 1;
                }
                debug!(total, hits, "Recorded prediction outcome");
            }
            MetricsAggregator::Remote { .. } => {
                debug!("Ignoring local record in remote metrics mode");
            }
        }
    }

    /// Replaces the cached snapshot (remote mode).
    #[instrument(skip(self))]
    pub fn update_snapshot(&mut self, new: MetricsSnapshot) {
        if let MetricsAggregator::Remote { snapshot } = self {
            *snapshot = Some(new);
        }
    }

    /// Accuracy in [0, 1]; 0 when nothing has been scored.
    pub fn accuracy(&self) -> f64 {
        match self {
            MetricsAggregator::Local { total: 0, .. } => 0.0,
            MetricsAggregator::Local { total, hits } => *hits as f64 / *total as f64,
            MetricsAggregator::Remote { snapshot } => {
                snapshot.as_ref().map(|s| s.acc).unwrap_or(0.0)
            }
        }
    }

    /// Display-ready view of the current counters.
    pub fn view(&self) -> MetricsView {
        match self {
            MetricsAggregator::Local { total, hits } => MetricsView {
                hits: *hits,
                total: *total,
                accuracy: self.accuracy(),
            },
            MetricsAggregator::Remote { snapshot } => snapshot
                .as_ref()
                .map(|s| MetricsView {
                    hits: s.hits,
                    total: s.n,
                    accuracy: s.acc,
                })
                .unwrap_or_default(),
        }
    }

    /// Clears all counters. Session reset only; board resets never call this.
    #[instrument(skip(self))]
    pub fn reset_session(&mut self) {
        debug!("Resetting metrics for new session");
        *self = MetricsAggregator::new(self.mode());
    }
}
