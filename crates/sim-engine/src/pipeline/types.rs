//! Core types for pipeline jobs and their outcomes.

use serde::{Deserialize, Serialize};

/// Outcome of processing a single work item.
///
/// Returned by the caller-supplied handler; interpreted by the worker that
/// invoked it. Expected failure conditions inside a handler must be turned
/// into [`JobOutcome::Skip`] or [`JobOutcome::Fatal`] rather than panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome<R> {
    /// Item processed; an output value may or may not have been produced.
    Success(Option<R>),

    /// Item processed, nothing produced. Not an error.
    Skip,

    /// Processing must stop the whole pipeline at the next safe boundary.
    Fatal,
}

/// Handler invoked by workers for each dequeued item.
///
/// Handlers may block or run long (simulations are CPU/IO heavy); the pool
/// imposes no per-item timeout.
pub type JobHandler<T, R> = dyn Fn(T) -> JobOutcome<R> + Send + Sync;

/// Aggregate counters maintained during a run.
///
/// `processed` counts `Success` and `Skip` outcomes; `failed` counts `Fatal`
/// outcomes and handler panics. All counters are monotonic within a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateCounts {
    /// Items processed to completion (success + skip).
    pub processed: u64,
    /// Items processed without producing output.
    pub skipped: u64,
    /// Items that ended in a fatal outcome or a handler panic.
    pub failed: u64,
}
