//! Worker loop: dequeue, invoke the handler, record the outcome.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use tracing::{debug, error, warn};

use super::config::PanicPolicy;
use super::controller::Shared;
use super::types::{JobHandler, JobOutcome};

/// Run one worker until end of stream or a stop request.
///
/// Each dequeued item is owned by this worker for the duration of the handler
/// invocation. A panic out of the handler is caught here, logged, and
/// escalated according to the configured [`PanicPolicy`]; it never propagates
/// past the worker.
pub(crate) fn run_worker<T, R>(
    worker_id: usize,
    shared: &Arc<Shared<T, R>>,
    handler: &Arc<JobHandler<T, R>>,
    panic_policy: PanicPolicy,
    track_progress: bool,
) {
    debug!(worker_id, "worker started");

    loop {
        if shared.stop_requested() {
            break;
        }
        let Some(item) = shared.queue.pop() else {
            break;
        };

        let outcome = match catch_unwind(AssertUnwindSafe(|| handler(item))) {
            Ok(outcome) => outcome,
            Err(_) => {
                error!(worker_id, "handler panicked; applying {panic_policy:?} policy");
                match panic_policy {
                    PanicPolicy::Skip => {
                        shared.aggregator.record_failure();
                        continue;
                    }
                    PanicPolicy::Fatal => JobOutcome::Fatal,
                }
            }
        };

        match outcome {
            JobOutcome::Success(output) => shared.aggregator.record_success(output),
            JobOutcome::Skip => shared.aggregator.record_skip(),
            JobOutcome::Fatal => {
                shared.aggregator.record_failure();
                warn!(worker_id, "fatal outcome; requesting pipeline stop");
                shared.request_stop();
                break;
            }
        }

        if track_progress {
            let progress = shared.tracker.snapshot(shared.aggregator.counts());
            debug!(
                worker_id,
                "completed {}/{} ({:.1}%)",
                progress.processed,
                progress.enqueued,
                progress.percentage()
            );
        }
    }

    debug!(worker_id, "worker exiting");
    shared.worker_exited();
}
