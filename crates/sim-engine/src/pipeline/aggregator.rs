//! Thread-safe result aggregation for pipeline workers.

use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;

use super::types::AggregateCounts;

/// Accumulates per-item outputs from concurrent workers.
///
/// All mutation goes through synchronized appends; concurrent records never
/// lose or duplicate an entry. The accumulated collection is intended to be
/// read only after a drain completes, so a reader never observes a
/// partially-populated aggregate. Final membership is independent of worker
/// interleaving.
#[derive(Debug)]
pub struct Aggregator<R> {
    outputs: Mutex<Vec<R>>,
    processed: AtomicU64,
    skipped: AtomicU64,
    failed: AtomicU64,
}

impl<R> Aggregator<R> {
    /// Create an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self {
            outputs: Mutex::new(Vec::new()),
            processed: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Record a successful item, appending its output if one was produced.
    pub fn record_success(&self, output: Option<R>) {
        if let Some(output) = output {
            self.outputs.lock().push(output);
        }
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item processed without output.
    pub fn record_skip(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an item that ended in a fatal outcome or handler panic.
    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Current counters.
    #[must_use]
    pub fn counts(&self) -> AggregateCounts {
        AggregateCounts {
            processed: self.processed.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Clear all accumulated state.
    ///
    /// Must only be called when no run is in progress.
    pub fn reset(&self) {
        self.outputs.lock().clear();
        self.processed.store(0, Ordering::Relaxed);
        self.skipped.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl<R: Clone> Aggregator<R> {
    /// Copy of the accumulated outputs.
    #[must_use]
    pub fn snapshot(&self) -> Vec<R> {
        self.outputs.lock().clone()
    }
}

impl<R> Default for Aggregator<R> {
    fn default() -> Self {
        Self::new()
    }
}
