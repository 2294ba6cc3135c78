//! Batch orchestration: fan a strategy x market cross product through the
//! pipeline and collect the results.

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;
use tracing::{info, warn};

use crate::domain::{MarketDescriptor, SimJob, StrategyRef, Trade};
use crate::pipeline::{JobOutcome, JobPipeline, PipelineConfig, PipelineError};
use crate::results::{ResultsStore, ResultsSummary, StoreError};

/// Errors raised inside a simulator for one strategy-market pair.
///
/// These are expected, item-local failures; the runner normalizes them to
/// skip (or fatal, when configured) rather than letting them escape a worker.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SimulatorError {
    /// Candle or market data required by the simulation is unavailable.
    #[error("missing data for market '{market}'")]
    MissingData {
        /// Market the data was missing for.
        market: String,
    },

    /// The simulation failed for any other reason.
    #[error("simulation failed: {message}")]
    Failed {
        /// Error message.
        message: String,
    },
}

/// The opaque simulation callback the engine fans out over.
///
/// Given one strategy-market pair it performs a potentially long-running
/// backtest and returns the trades it produced, `Ok(None)` when there is
/// nothing to report.
pub trait Simulator: Send + Sync {
    /// Simulate one strategy against one market.
    fn run(&self, job: &SimJob) -> Result<Option<Vec<Trade>>, SimulatorError>;
}

/// Errors from a batch run.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// No work to do: strategies or markets were empty.
    #[error("no strategy-market pairs to run")]
    NoJobs,

    /// Pipeline lifecycle error.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// Results persistence error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Final report for one batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    /// All trades produced across the batch, in no guaranteed order.
    pub trades: Vec<Trade>,
    /// Headline statistics over `trades`.
    pub summary: ResultsSummary,
    /// Strategy-market pairs processed to completion.
    pub jobs_processed: u64,
    /// Pairs that produced no trades.
    pub jobs_skipped: u64,
    /// Pairs that ended in a fatal outcome or panic.
    pub jobs_failed: u64,
    /// Whether the run was cut short by a stop request or fatal outcome.
    pub stopped_early: bool,
    /// Wall-clock duration of the run in milliseconds.
    pub total_time_ms: u64,
}

/// Runs a batch of simulations: every selected strategy against every
/// selected market, fanned out over the pipeline's worker pool.
pub struct BatchRunner {
    simulator: Arc<dyn Simulator>,
    config: PipelineConfig,
    store: Option<ResultsStore>,
    stop_on_error: bool,
}

impl BatchRunner {
    /// Create a runner over the given simulator.
    #[must_use]
    pub fn new(simulator: Arc<dyn Simulator>, config: PipelineConfig) -> Self {
        Self {
            simulator,
            config,
            store: None,
            stop_on_error: false,
        }
    }

    /// Persist the drained aggregate to the given store after each run.
    #[must_use]
    pub fn with_store(mut self, store: ResultsStore) -> Self {
        self.store = Some(store);
        self
    }

    /// Escalate simulator errors to a pipeline-wide stop instead of skipping
    /// the failing pair.
    #[must_use]
    pub fn stop_on_error(mut self, enabled: bool) -> Self {
        self.stop_on_error = enabled;
        self
    }

    /// Run every strategy against every market and return the aggregate.
    ///
    /// Blocks the calling thread until the batch has drained. A fatal outcome
    /// stops the batch early but still returns the partial-but-consistent
    /// aggregate recorded up to that point.
    ///
    /// # Errors
    ///
    /// Fails when there is no work, on pipeline lifecycle misuse, or when
    /// persisting the results fails.
    pub fn run(
        &self,
        strategies: &[StrategyRef],
        markets: &[MarketDescriptor],
    ) -> Result<BatchReport, RunnerError> {
        if strategies.is_empty() || markets.is_empty() {
            return Err(RunnerError::NoJobs);
        }

        let total = strategies.len() * markets.len();
        info!(
            strategies = strategies.len(),
            markets = markets.len(),
            total,
            "running simulation batch"
        );
        let started = Instant::now();

        let simulator = Arc::clone(&self.simulator);
        let stop_on_error = self.stop_on_error;
        let pipeline = JobPipeline::new(self.config.clone(), move |job: SimJob| {
            match simulator.run(&job) {
                Ok(Some(trades)) => JobOutcome::Success(Some(trades)),
                Ok(None) => JobOutcome::Skip,
                Err(e) => {
                    warn!(job = %job.label(), "simulation error: {e}");
                    if stop_on_error {
                        JobOutcome::Fatal
                    } else {
                        JobOutcome::Skip
                    }
                }
            }
        })?;

        // Workers start before production so a bounded queue smaller than the
        // cross product cannot deadlock the producer.
        pipeline.start()?;

        'produce: for market in markets {
            for strategy in strategies {
                match pipeline.enqueue(SimJob::new(strategy.clone(), market.clone())) {
                    Ok(()) => {}
                    // A fatal outcome mid-production; stop feeding and drain.
                    Err(PipelineError::Stopped) => break 'produce,
                    Err(e) => return Err(e.into()),
                }
            }
        }
        pipeline.mark_production_complete();

        let report = pipeline.wait_until_drained()?;
        let trades: Vec<Trade> = report.outputs.into_iter().flatten().collect();
        let summary = ResultsSummary::from_trades(&trades);

        if let Some(store) = &self.store {
            store.save(&trades)?;
        }

        info!(
            trades = trades.len(),
            processed = report.processed,
            "simulation batch completed in {:.2}s",
            started.elapsed().as_secs_f64()
        );

        Ok(BatchReport {
            trades,
            summary,
            jobs_processed: report.processed,
            jobs_skipped: report.skipped,
            jobs_failed: report.failed,
            stopped_early: report.stopped_early,
            total_time_ms: report.total_time_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;

    use super::*;

    struct OneTradeSimulator;

    impl Simulator for OneTradeSimulator {
        fn run(&self, job: &SimJob) -> Result<Option<Vec<Trade>>, SimulatorError> {
            let now = Utc::now();
            Ok(Some(vec![Trade::closed(
                &job.strategy.name,
                &job.market.symbol,
                now,
                now,
                dec!(1),
            )]))
        }
    }

    struct FailingSimulator;

    impl Simulator for FailingSimulator {
        fn run(&self, job: &SimJob) -> Result<Option<Vec<Trade>>, SimulatorError> {
            Err(SimulatorError::MissingData {
                market: job.market.symbol.clone(),
            })
        }
    }

    fn strategies() -> Vec<StrategyRef> {
        vec![StrategyRef::new("A"), StrategyRef::new("B")]
    }

    fn markets() -> Vec<MarketDescriptor> {
        vec![
            MarketDescriptor::new("FXCM", "EUR/USD"),
            MarketDescriptor::new("FXCM", "GBP/USD"),
            MarketDescriptor::new("FXCM", "USD/JPY"),
        ]
    }

    #[test]
    fn test_cross_product_produces_one_trade_per_pair() {
        let runner = BatchRunner::new(Arc::new(OneTradeSimulator), PipelineConfig::default());
        let report = runner.run(&strategies(), &markets()).unwrap();

        assert_eq!(report.jobs_processed, 6);
        assert_eq!(report.trades.len(), 6);
        assert_eq!(report.summary.total_trades, 6);
        assert!(!report.stopped_early);
    }

    #[test]
    fn test_simulator_errors_skip_by_default() {
        let runner = BatchRunner::new(Arc::new(FailingSimulator), PipelineConfig::default());
        let report = runner.run(&strategies(), &markets()).unwrap();

        assert_eq!(report.jobs_processed, 6);
        assert_eq!(report.jobs_skipped, 6);
        assert!(report.trades.is_empty());
    }

    #[test]
    fn test_stop_on_error_ends_the_batch_early() {
        let runner = BatchRunner::new(Arc::new(FailingSimulator), PipelineConfig::default())
            .stop_on_error(true);
        let report = runner.run(&strategies(), &markets()).unwrap();

        assert!(report.stopped_early);
        assert!(report.jobs_failed >= 1);
        assert!(report.trades.is_empty());
    }

    #[test]
    fn test_empty_selection_is_rejected() {
        let runner = BatchRunner::new(Arc::new(OneTradeSimulator), PipelineConfig::default());

        assert!(matches!(
            runner.run(&[], &markets()),
            Err(RunnerError::NoJobs)
        ));
        assert!(matches!(
            runner.run(&strategies(), &[]),
            Err(RunnerError::NoJobs)
        ));
    }
}
