//! Progress tracking for pipeline runs.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::types::AggregateCounts;

/// Tracks items fed into the pipeline and run timing.
///
/// Unlike a fixed-size batch, the total grows as the producer enqueues; the
/// snapshot reports progress against items enqueued so far.
#[derive(Debug)]
pub struct ProgressTracker {
    enqueued: AtomicU64,
    started_at: Mutex<Instant>,
}

impl ProgressTracker {
    /// Create a new tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            started_at: Mutex::new(Instant::now()),
        }
    }

    /// Restart the run clock. Items may be buffered well before workers
    /// spawn; elapsed time is measured from the last call here.
    pub fn mark_started(&self) {
        *self.started_at.lock() = Instant::now();
    }

    /// Record one enqueued item.
    pub fn item_enqueued(&self) {
        self.enqueued.fetch_add(1, Ordering::Relaxed);
    }

    /// Items enqueued so far.
    #[must_use]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    /// Milliseconds since the run clock was last started.
    #[must_use]
    pub fn elapsed_ms(&self) -> u64 {
        self.started_at.lock().elapsed().as_millis() as u64
    }

    /// Take a progress snapshot against the given aggregate counters.
    #[must_use]
    pub fn snapshot(&self, counts: AggregateCounts) -> Progress {
        let elapsed = self.started_at.lock().elapsed();
        let jobs_per_sec = if elapsed.as_secs_f64() > 0.0 {
            counts.processed as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Progress {
            enqueued: self.enqueued(),
            processed: counts.processed,
            skipped: counts.skipped,
            failed: counts.failed,
            elapsed_secs: elapsed.as_secs(),
            jobs_per_sec,
        }
    }
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Progress snapshot.
///
/// A plain completion/progress signal; marshaling it to any presentation
/// layer is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progress {
    /// Items enqueued so far.
    pub enqueued: u64,
    /// Items processed (success + skip).
    pub processed: u64,
    /// Items processed without output.
    pub skipped: u64,
    /// Items that failed.
    pub failed: u64,
    /// Elapsed time in seconds.
    pub elapsed_secs: u64,
    /// Items processed per second.
    pub jobs_per_sec: f64,
}

impl Progress {
    /// Completion percentage against items enqueued so far.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        if self.enqueued == 0 {
            100.0
        } else {
            (self.processed as f64 / self.enqueued as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_snapshot() {
        let tracker = ProgressTracker::new();
        for _ in 0..10 {
            tracker.item_enqueued();
        }

        let progress = tracker.snapshot(AggregateCounts {
            processed: 3,
            skipped: 1,
            failed: 0,
        });

        assert_eq!(progress.enqueued, 10);
        assert_eq!(progress.processed, 3);
        assert!((progress.percentage() - 30.0).abs() < 0.1);
    }

    #[test]
    fn test_empty_run_is_complete() {
        let tracker = ProgressTracker::new();
        let progress = tracker.snapshot(AggregateCounts::default());

        assert!((progress.percentage() - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_mark_started_restarts_the_clock() {
        let tracker = ProgressTracker::new();
        std::thread::sleep(std::time::Duration::from_millis(200));

        tracker.mark_started();

        assert!(tracker.elapsed_ms() < 200);
    }
}
