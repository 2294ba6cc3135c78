//! Configuration for the job pipeline.

use serde::{Deserialize, Serialize};

/// How a worker treats a panic raised out of the caller-supplied handler.
///
/// Expected failures should be returned as [`crate::pipeline::JobOutcome`]
/// values; this policy only governs failures the handler did not translate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanicPolicy {
    /// Count the item as failed and keep the pipeline running.
    Skip,

    /// Treat the panic like a `Fatal` outcome: stop the whole pipeline.
    #[default]
    Fatal,
}

/// Configuration for a [`crate::pipeline::JobPipeline`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Number of concurrent workers. Fixed for the lifetime of a run.
    pub concurrency: usize,

    /// Queue capacity; a full queue blocks the producer (backpressure).
    pub queue_capacity: usize,

    /// Whether workers emit per-item progress logs.
    pub track_progress: bool,

    /// How handler panics are escalated.
    pub panic_policy: PanicPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            queue_capacity: 1024,
            track_progress: true,
            panic_policy: PanicPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_config_default() {
        let config = PipelineConfig::default();

        assert_eq!(config.concurrency, 3);
        assert_eq!(config.queue_capacity, 1024);
        assert!(config.track_progress);
        assert_eq!(config.panic_policy, PanicPolicy::Fatal);
    }

    #[test]
    fn test_partial_yaml_fills_defaults() {
        let config: PipelineConfig = match serde_yaml_bw::from_str("concurrency: 8") {
            Ok(c) => c,
            Err(e) => panic!("parse failed: {e}"),
        };

        assert_eq!(config.concurrency, 8);
        assert_eq!(config.queue_capacity, 1024);
    }
}
