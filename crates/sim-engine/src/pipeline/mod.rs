//! Bounded producer-consumer pipeline.
//!
//! Fans independent work items out across a fixed pool of worker threads,
//! collects per-item outputs into a shared aggregate, and exposes a lifecycle
//! a caller on any thread can drive safely:
//!
//! 1. construct with a concurrency degree and a handler,
//! 2. [`enqueue`](JobPipeline::enqueue) items (bounded queue; a full queue
//!    blocks the producer),
//! 3. [`start`](JobPipeline::start) the workers,
//! 4. [`mark_production_complete`](JobPipeline::mark_production_complete),
//! 5. [`wait_until_drained`](JobPipeline::wait_until_drained) for the final
//!    aggregate.
//!
//! Items are processed in no guaranteed order; the aggregate's final
//! membership is the only deterministic property. Cancellation via
//! [`stop`](JobPipeline::stop) is cooperative: in-flight handler invocations
//! always run to completion.
//!
//! # Example
//!
//! ```
//! use sim_engine::pipeline::{JobOutcome, JobPipeline, PipelineConfig};
//!
//! # fn main() -> Result<(), sim_engine::pipeline::PipelineError> {
//! let pipeline = JobPipeline::new(PipelineConfig::default(), |n: u64| {
//!     JobOutcome::Success(Some(n * 2))
//! })?;
//!
//! pipeline.start()?;
//! for n in 0..6 {
//!     pipeline.enqueue(n)?;
//! }
//! pipeline.mark_production_complete();
//!
//! let report = pipeline.wait_until_drained()?;
//! assert_eq!(report.processed, 6);
//! # Ok(())
//! # }
//! ```

mod aggregator;
mod config;
mod controller;
mod error;
mod progress;
mod queue;
mod types;
mod worker;

pub use aggregator::Aggregator;
pub use config::{PanicPolicy, PipelineConfig};
pub use controller::{JobPipeline, PipelineReport, PipelineState};
pub use error::PipelineError;
pub use progress::{Progress, ProgressTracker};
pub use queue::{BoundedQueue, PushError};
pub use types::{AggregateCounts, JobHandler, JobOutcome};
