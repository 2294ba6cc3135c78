//! Pipeline lifecycle controller and state machine.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::thread;

use parking_lot::{Condvar, Mutex};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::aggregator::Aggregator;
use super::config::PipelineConfig;
use super::error::PipelineError;
use super::progress::{Progress, ProgressTracker};
use super::queue::{BoundedQueue, PushError};
use super::types::{JobHandler, JobOutcome};
use super::worker::run_worker;

/// Lifecycle state of a pipeline run.
///
/// Exactly one controller owns this state per run; transitions are serialized
/// under a single lock so no two transitions race.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed; items may be buffered but no workers run yet.
    Idle,
    /// Workers are consuming the queue.
    Running,
    /// A cooperative stop was requested; workers finish their current item.
    StopRequested,
    /// All workers have exited; the aggregate is fully materialized.
    Completed,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::StopRequested => "stop-requested",
            Self::Completed => "completed",
        };
        write!(f, "{name}")
    }
}

/// Final report returned once a run has drained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineReport<R> {
    /// Outputs recorded by workers, in no guaranteed order.
    pub outputs: Vec<R>,
    /// Items enqueued over the lifetime of the run.
    pub enqueued: u64,
    /// Items processed to completion (success + skip).
    pub processed: u64,
    /// Items processed without producing output.
    pub skipped: u64,
    /// Items that ended in a fatal outcome or handler panic.
    pub failed: u64,
    /// Whether the run ended via a stop request rather than a full drain.
    pub stopped_early: bool,
    /// Wall-clock duration of the run in milliseconds.
    pub total_time_ms: u64,
}

impl<R> PipelineReport<R> {
    /// Whether the aggregate is partial (stopped early or saw failures).
    #[must_use]
    pub fn is_partial(&self) -> bool {
        self.stopped_early || self.failed > 0
    }
}

/// State shared between the controller and its workers.
pub(crate) struct Shared<T, R> {
    pub(crate) queue: BoundedQueue<T>,
    pub(crate) aggregator: Aggregator<R>,
    pub(crate) tracker: ProgressTracker,
    stop: AtomicBool,
    stopped_early: AtomicBool,
    state: Mutex<PipelineState>,
    state_changed: Condvar,
    active_workers: AtomicUsize,
    total_time_ms: AtomicU64,
}

impl<T, R> Shared<T, R> {
    fn new(queue_capacity: usize) -> Self {
        Self {
            queue: BoundedQueue::new(queue_capacity),
            aggregator: Aggregator::new(),
            tracker: ProgressTracker::new(),
            stop: AtomicBool::new(false),
            stopped_early: AtomicBool::new(false),
            state: Mutex::new(PipelineState::Idle),
            state_changed: Condvar::new(),
            active_workers: AtomicUsize::new(0),
            total_time_ms: AtomicU64::new(0),
        }
    }

    /// Whether a cooperative stop has been requested.
    pub(crate) fn stop_requested(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    /// Request a cooperative stop. Idempotent; callable from any thread.
    pub(crate) fn request_stop(&self) {
        if self.stop.swap(true, Ordering::AcqRel) {
            return;
        }
        self.queue.stop();
        let mut state = self.state.lock();
        if *state == PipelineState::Running {
            *state = PipelineState::StopRequested;
        }
    }

    /// Bookkeeping for a worker leaving its loop; the last one out completes
    /// the run and wakes every drain waiter.
    pub(crate) fn worker_exited(&self) {
        if self.active_workers.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.complete();
        }
    }

    /// Seal the run: latch whether a stop cut it short, record the final
    /// timing and wake every drain waiter. A stop requested after this point
    /// no longer affects the report.
    fn complete(&self) {
        self.stopped_early
            .store(self.stop.load(Ordering::Acquire), Ordering::Release);
        self.total_time_ms
            .store(self.tracker.elapsed_ms(), Ordering::Relaxed);
        let mut state = self.state.lock();
        *state = PipelineState::Completed;
        drop(state);
        self.state_changed.notify_all();
    }
}

/// Lifecycle facade over the bounded queue, worker pool and aggregator.
///
/// A controller drives exactly one run: construct, feed via [`enqueue`],
/// [`start`] the workers, [`mark_production_complete`], then block on
/// [`wait_until_drained`] for the fully-materialized aggregate. [`stop`] is a
/// cooperative cancel observed at the next dequeue boundary.
///
/// [`enqueue`]: JobPipeline::enqueue
/// [`start`]: JobPipeline::start
/// [`mark_production_complete`]: JobPipeline::mark_production_complete
/// [`wait_until_drained`]: JobPipeline::wait_until_drained
/// [`stop`]: JobPipeline::stop
pub struct JobPipeline<T, R> {
    shared: Arc<Shared<T, R>>,
    handler: Arc<JobHandler<T, R>>,
    config: PipelineConfig,
    handles: Mutex<Vec<thread::JoinHandle<()>>>,
}

impl<T, R> JobPipeline<T, R>
where
    T: Send + 'static,
    R: Send + 'static,
{
    /// Create a pipeline in the `Idle` state.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured concurrency or queue capacity
    /// is zero.
    pub fn new<F>(config: PipelineConfig, handler: F) -> Result<Self, PipelineError>
    where
        F: Fn(T) -> JobOutcome<R> + Send + Sync + 'static,
    {
        if config.concurrency == 0 {
            return Err(PipelineError::InvalidConcurrency);
        }
        if config.queue_capacity == 0 {
            return Err(PipelineError::InvalidCapacity);
        }

        Ok(Self {
            shared: Arc::new(Shared::new(config.queue_capacity)),
            handler: Arc::new(handler),
            config,
            handles: Mutex::new(Vec::new()),
        })
    }

    /// Add a work item, blocking while the queue is at capacity.
    ///
    /// Valid while idle (items are buffered for the workers) or running.
    ///
    /// # Errors
    ///
    /// Fails once production has been marked complete or a stop was requested.
    pub fn enqueue(&self, item: T) -> Result<(), PipelineError> {
        if self.shared.stop_requested() {
            return Err(PipelineError::Stopped);
        }
        self.shared.queue.push(item).map_err(|e| match e {
            PushError::Closed => PipelineError::ProductionComplete,
            PushError::Stopped => PipelineError::Stopped,
        })?;
        self.shared.tracker.item_enqueued();
        Ok(())
    }

    /// Spawn the configured number of workers.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AlreadyStarted`] on a second call without an
    /// intervening reset, or [`PipelineError::WorkerSpawn`] if the OS refuses
    /// a thread (the run is stopped and accounted for in that case).
    pub fn start(&self) -> Result<(), PipelineError> {
        {
            let mut state = self.shared.state.lock();
            if *state != PipelineState::Idle {
                return Err(PipelineError::AlreadyStarted { state: *state });
            }
            *state = PipelineState::Running;
        }
        self.shared.tracker.mark_started();

        info!(
            concurrency = self.config.concurrency,
            queue_capacity = self.config.queue_capacity,
            "starting pipeline workers"
        );

        self.shared
            .active_workers
            .store(self.config.concurrency, Ordering::Release);

        let mut handles = self.handles.lock();
        for worker_id in 0..self.config.concurrency {
            let shared = Arc::clone(&self.shared);
            let handler = Arc::clone(&self.handler);
            let panic_policy = self.config.panic_policy;
            let track_progress = self.config.track_progress;

            let spawned = thread::Builder::new()
                .name(format!("sim-worker-{worker_id}"))
                .spawn(move || run_worker(worker_id, &shared, &handler, panic_policy, track_progress));

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    warn!(worker_id, "worker spawn failed: {e}");
                    self.shared.request_stop();
                    // Account for this worker and the ones never attempted.
                    for _ in worker_id..self.config.concurrency {
                        self.shared.worker_exited();
                    }
                    return Err(PipelineError::WorkerSpawn {
                        message: e.to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Signal that no more items will be enqueued. Idempotent.
    ///
    /// Workers drain the remaining items and then observe end of stream.
    pub fn mark_production_complete(&self) {
        self.shared.queue.close();
    }

    /// Request a cooperative stop. Idempotent; callable from any thread in
    /// any state. Once the run has completed it has no further effect and
    /// does not alter the final report.
    ///
    /// Workers observe the stop at their next dequeue boundary; an in-flight
    /// handler invocation is never interrupted.
    pub fn stop(&self) {
        self.shared.request_stop();

        // A pipeline stopped before start() has no workers to drain it.
        let needs_completion = {
            let state = self.shared.state.lock();
            *state == PipelineState::Idle
        };
        if needs_completion {
            self.shared.complete();
        }
    }

    /// Block until production is complete, the queue is empty and every
    /// worker has exited, then return the final aggregate.
    ///
    /// Returns immediately if the run already completed (normally or via
    /// [`stop`](JobPipeline::stop)). Never returns before production has been
    /// marked complete unless a stop was requested, so a caller that owns the
    /// producer role must call
    /// [`mark_production_complete`](JobPipeline::mark_production_complete)
    /// first or drain from another thread.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotStarted`] when called before
    /// [`start`](JobPipeline::start); waiting then would block forever.
    pub fn wait_until_drained(&self) -> Result<PipelineReport<R>, PipelineError>
    where
        R: Clone,
    {
        {
            let mut state = self.shared.state.lock();
            loop {
                match *state {
                    PipelineState::Idle => return Err(PipelineError::NotStarted),
                    PipelineState::Completed => break,
                    PipelineState::Running | PipelineState::StopRequested => {
                        self.shared.state_changed.wait(&mut state);
                    }
                }
            }
        }

        // First waiter through joins the worker threads.
        let handles: Vec<_> = self.handles.lock().drain(..).collect();
        if !handles.is_empty() {
            for handle in handles {
                let _ = handle.join();
            }
            let report = self.build_report();
            info!(
                processed = report.processed,
                skipped = report.skipped,
                failed = report.failed,
                stopped_early = report.stopped_early,
                "pipeline drained in {:.2}s",
                report.total_time_ms as f64 / 1000.0
            );
            return Ok(report);
        }

        Ok(self.build_report())
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> PipelineState {
        *self.shared.state.lock()
    }

    /// Progress snapshot for the current run.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.shared
            .tracker
            .snapshot(self.shared.aggregator.counts())
    }

    fn build_report(&self) -> PipelineReport<R>
    where
        R: Clone,
    {
        let counts = self.shared.aggregator.counts();
        PipelineReport {
            outputs: self.shared.aggregator.snapshot(),
            enqueued: self.shared.tracker.enqueued(),
            processed: counts.processed,
            skipped: counts.skipped,
            failed: counts.failed,
            stopped_early: self.shared.stopped_early.load(Ordering::Acquire),
            total_time_ms: self.shared.total_time_ms.load(Ordering::Relaxed),
        }
    }
}
