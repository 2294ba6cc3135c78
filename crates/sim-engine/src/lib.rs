// Allow unwrap/expect in tests - tests should panic on unexpected errors
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Sim Engine - Parallel Strategy Simulation Pipeline
//!
//! Fans a strategy x market cross product out across a bounded pool of
//! concurrent workers, collects per-item results into a shared aggregate, and
//! exposes a lifecycle contract (start, feed, drain, stop) that a caller on
//! any thread can drive safely.
//!
//! # Architecture
//!
//! - [`pipeline`]: the reusable core - bounded queue, worker pool, result
//!   aggregator and lifecycle controller ([`pipeline::JobPipeline`]).
//! - [`domain`]: the work being fanned out - strategy references, market
//!   descriptors and the trades a simulation produces.
//! - [`runner`]: orchestration glue - [`runner::BatchRunner`] enqueues the
//!   cross product, drives the pipeline and summarizes the aggregate.
//! - [`results`]: consumption of the drained aggregate - headline statistics
//!   and JSON persistence.
//! - [`config`] / [`observability`]: YAML configuration and console logging.
//!
//! The simulation algorithm itself is an opaque collaborator behind the
//! [`runner::Simulator`] trait; the engine has no opinion on how a
//! strategy-market pair turns into trades.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod domain;
pub mod observability;
pub mod pipeline;
pub mod results;
pub mod runner;

pub use config::{ConfigError, EngineConfig, ResultsConfig, load_config};
pub use domain::{MarketDescriptor, SimJob, StrategyRef, Trade};
pub use pipeline::{
    JobOutcome, JobPipeline, PanicPolicy, PipelineConfig, PipelineError, PipelineReport,
    PipelineState, Progress,
};
pub use results::{ResultsStore, ResultsSummary, StoreError};
pub use runner::{BatchReport, BatchRunner, RunnerError, Simulator, SimulatorError};
