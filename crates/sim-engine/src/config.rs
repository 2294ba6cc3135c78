//! Configuration loading for the simulation engine.
//!
//! # Usage
//!
//! ```rust,ignore
//! use sim_engine::config::load_config;
//!
//! // Load from default path (config.yaml)
//! let config = load_config(None)?;
//!
//! // Load from custom path
//! let config = load_config(Some("custom/config.yaml"))?;
//! ```

use std::fs;
use std::io;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pipeline::PipelineConfig;

/// Default configuration file path.
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        /// Path to the config file.
        path: String,
        /// The underlying IO error.
        source: io::Error,
    },

    /// Failed to parse YAML configuration.
    #[error("failed to parse config YAML: {0}")]
    ParseError(#[from] serde_yaml_bw::Error),

    /// Configuration validation failed.
    #[error("config validation failed: {0}")]
    ValidationError(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Pipeline configuration.
    #[serde(default)]
    pub pipeline: PipelineConfig,
    /// Results persistence configuration.
    #[serde(default)]
    pub results: ResultsConfig,
}

impl EngineConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError::ValidationError`] describing the first
    /// invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pipeline.concurrency == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.concurrency must be at least 1".to_string(),
            ));
        }
        if self.pipeline.queue_capacity == 0 {
            return Err(ConfigError::ValidationError(
                "pipeline.queue_capacity must be at least 1".to_string(),
            ));
        }
        if self.results.enabled && self.results.path.is_empty() {
            return Err(ConfigError::ValidationError(
                "results.path must not be empty when results.enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Results persistence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResultsConfig {
    /// Whether the drained aggregate is saved after each run.
    pub enabled: bool,
    /// Path of the results JSON file.
    pub path: String,
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "StrategyTesterResults.json".to_string(),
        }
    }
}

/// Load and validate configuration from a YAML file.
///
/// # Errors
///
/// Returns an error when the file cannot be read, parsed, or validated.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig, ConfigError> {
    let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
        path: path.to_string(),
        source,
    })?;

    let config: EngineConfig = serde_yaml_bw::from_str(&raw)?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();

        assert_eq!(config.pipeline.concurrency, 3);
        assert!(config.results.enabled);
        assert_eq!(config.results.path, "StrategyTesterResults.json");
    }

    #[test]
    fn test_zero_concurrency_fails_validation() {
        let mut config = EngineConfig::default();
        config.pipeline.concurrency = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_load_partial_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "pipeline:\n  concurrency: 8").unwrap();

        let config = load_config(file.path().to_str()).unwrap();

        assert_eq!(config.pipeline.concurrency, 8);
        // Unspecified sections fall back to defaults.
        assert_eq!(config.pipeline.queue_capacity, 1024);
        assert!(config.results.enabled);
    }

    #[test]
    fn test_load_missing_file_is_read_error() {
        let result = load_config(Some("does/not/exist.yaml"));
        assert!(matches!(result, Err(ConfigError::ReadError { .. })));
    }
}
