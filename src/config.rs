//! Client configuration: oracle endpoint, protocol variant, metrics mode.

use crate::metrics::MetricsMode;
use crate::oracle::Protocol;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Oracle protocol family, as written in config files and CLI flags.
///
/// Combined with the configured model name to build the full
/// [`Protocol`] value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ProtocolKind {
    /// `POST /predict-state` with correlation ids and ground-truth logging.
    Correlated,
    /// `POST /predict/{model}`, uncorrelated.
    PerModel,
}

/// Configuration for the oracle client and game loop.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct OracleConfig {
    /// Base URL of the oracle service.
    #[serde(default = "default_base_url")]
    base_url: String,

    /// Which endpoint family the oracle speaks.
    #[serde(default = "default_protocol")]
    protocol: ProtocolKind,

    /// Model route segment for the per-model protocol ("mlp", "knn",
    /// "arvore"). Ignored by the correlated protocol.
    #[serde(default = "default_model")]
    model: String,

    /// Accuracy accounting mode. The correlated protocol pairs naturally
    /// with remote metrics, the per-model protocol with local.
    #[serde(default = "default_metrics")]
    metrics: MetricsMode,

    /// Pause before the bot reply, in milliseconds.
    #[serde(default = "default_bot_delay_ms")]
    bot_delay_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_protocol() -> ProtocolKind {
    ProtocolKind::Correlated
}

fn default_model() -> String {
    "mlp".to_string()
}

fn default_metrics() -> MetricsMode {
    MetricsMode::Remote
}

fn default_bot_delay_ms() -> u64 {
    250
}

impl OracleConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {e}")))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;

        info!(base_url = %config.base_url, "Config loaded successfully");
        Ok(config)
    }

    /// Builds the full protocol value for the prediction client.
    pub fn oracle_protocol(&self) -> Protocol {
        match self.protocol {
            ProtocolKind::Correlated => Protocol::Correlated,
            ProtocolKind::PerModel => Protocol::PerModel {
                model: self.model.clone(),
            },
        }
    }

    /// Overrides the base URL.
    pub fn set_base_url(&mut self, base_url: String) {
        self.base_url = base_url;
    }

    /// Overrides the protocol kind.
    pub fn set_protocol(&mut self, protocol: ProtocolKind) {
        self.protocol = protocol;
    }

    /// Overrides the model name.
    pub fn set_model(&mut self, model: String) {
        self.model = model;
    }

    /// Overrides the metrics mode.
    pub fn set_metrics(&mut self, metrics: MetricsMode) {
        self.metrics = metrics;
    }

    /// Overrides the bot delay.
    pub fn set_bot_delay_ms(&mut self, bot_delay_ms: u64) {
        self.bot_delay_ms = bot_delay_ms;
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            protocol: default_protocol(),
            model: default_model(),
            metrics: default_metrics(),
            bot_delay_ms: default_bot_delay_ms(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OracleConfig::default();
        assert_eq!(config.base_url(), "http://127.0.0.1:8000");
        assert_eq!(*config.protocol(), ProtocolKind::Correlated);
        assert_eq!(config.oracle_protocol(), Protocol::Correlated);
        assert_eq!(*config.metrics(), MetricsMode::Remote);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: OracleConfig = toml::from_str(
            r#"
            base_url = "http://oracle.local:9000"
            protocol = "per-model"
            model = "knn"
            metrics = "local"
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url(), "http://oracle.local:9000");
        assert_eq!(
            config.oracle_protocol(),
            Protocol::PerModel {
                model: "knn".to_string()
            }
        );
        assert_eq!(*config.metrics(), MetricsMode::Local);
        assert_eq!(*config.bot_delay_ms(), 250);
    }

    #[test]
    fn test_malformed_toml_is_config_error() {
        let result = toml::from_str::<OracleConfig>("protocol = \"grpc\"");
        assert!(result.is_err());
    }
}
