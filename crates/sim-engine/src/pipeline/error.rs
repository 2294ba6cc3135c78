//! Error types for pipeline lifecycle operations.

use thiserror::Error;

use super::controller::PipelineState;

/// Errors from misusing the pipeline lifecycle API.
///
/// These are reported synchronously to the misusing caller and never corrupt
/// pipeline state for already-running workers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    /// Concurrency degree must be at least 1.
    #[error("concurrency must be at least 1")]
    InvalidConcurrency,

    /// Queue capacity must be at least 1.
    #[error("queue capacity must be at least 1")]
    InvalidCapacity,

    /// `start()` was called more than once for this run.
    #[error("start() is only valid in the idle state (current: {state})")]
    AlreadyStarted {
        /// State the pipeline was in when `start()` was called.
        state: PipelineState,
    },

    /// `wait_until_drained()` was called before `start()`.
    #[error("wait_until_drained() called before start()")]
    NotStarted,

    /// `enqueue()` was called after production was marked complete.
    #[error("enqueue() called after production was marked complete")]
    ProductionComplete,

    /// `enqueue()` was called after a stop was requested.
    #[error("enqueue() called after stop was requested")]
    Stopped,

    /// A worker thread could not be spawned.
    #[error("failed to spawn worker thread: {message}")]
    WorkerSpawn {
        /// Error message from the OS.
        message: String,
    },
}
