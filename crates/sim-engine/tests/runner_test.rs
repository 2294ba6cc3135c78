//! End-to-end batch runs with a fake simulator and a results store.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use rust_decimal_macros::dec;
use sim_engine::domain::{MarketDescriptor, SimJob, StrategyRef, Trade};
use sim_engine::pipeline::PipelineConfig;
use sim_engine::results::ResultsStore;
use sim_engine::runner::{BatchRunner, Simulator, SimulatorError};

/// One winning and one losing trade per pair, with a little scheduling skew.
struct FakeSimulator;

impl Simulator for FakeSimulator {
    fn run(&self, job: &SimJob) -> Result<Option<Vec<Trade>>, SimulatorError> {
        thread::sleep(Duration::from_millis(
            u64::from(job.market.symbol.len() as u32 % 3) * 5,
        ));
        let now = Utc::now();
        Ok(Some(vec![
            Trade::closed(&job.strategy.name, &job.market.symbol, now, now, dec!(2)),
            Trade::closed(&job.strategy.name, &job.market.symbol, now, now, dec!(-1)),
        ]))
    }
}

/// Produces nothing for one market, fails for another.
struct PatchySimulator;

impl Simulator for PatchySimulator {
    fn run(&self, job: &SimJob) -> Result<Option<Vec<Trade>>, SimulatorError> {
        match job.market.symbol.as_str() {
            "GBP/USD" => Ok(None),
            "USD/JPY" => Err(SimulatorError::MissingData {
                market: job.market.symbol.clone(),
            }),
            _ => {
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
    }
}

fn strategies() -> Vec<StrategyRef> {
    vec![StrategyRef::new("Trend"), StrategyRef::new("Breakout")]
}

fn markets() -> Vec<MarketDescriptor> {
    vec![
        MarketDescriptor::new("FXCM", "EUR/USD"),
        MarketDescriptor::new("FXCM", "GBP/USD"),
        MarketDescriptor::new("FXCM", "USD/JPY"),
    ]
}

#[test]
fn batch_run_aggregates_and_persists_all_trades() {
    let dir = tempfile::tempdir().unwrap();
    let store = ResultsStore::new(dir.path().join("results.json"));

    let runner = BatchRunner::new(Arc::new(FakeSimulator), PipelineConfig::default())
        .with_store(store.clone());
    let report = runner.run(&strategies(), &markets()).unwrap();

    // 2 strategies x 3 markets, two trades each.
    assert_eq!(report.jobs_processed, 6);
    assert_eq!(report.trades.len(), 12);
    assert_eq!(report.summary.total_trades, 12);
    assert_eq!(report.summary.percent_success, Some(dec!(50)));
    assert_eq!(report.summary.total_r, dec!(6));

    // The persisted file holds the fully-materialized aggregate.
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.len(), 12);
}

#[test]
fn skips_and_errors_do_not_abort_the_batch() {
    let runner = BatchRunner::new(Arc::new(PatchySimulator), PipelineConfig::default());
    let report = runner.run(&strategies(), &markets()).unwrap();

    // Every pair is processed; only EUR/USD pairs produce trades.
    assert_eq!(report.jobs_processed, 6);
    assert_eq!(report.jobs_skipped, 4);
    assert_eq!(report.trades.len(), 2);
    assert!(!report.stopped_early);
}

#[test]
fn single_worker_batch_behaves_identically() {
    let config = PipelineConfig {
        concurrency: 1,
        ..PipelineConfig::default()
    };
    let runner = BatchRunner::new(Arc::new(FakeSimulator), config);
    let report = runner.run(&strategies(), &markets()).unwrap();

    assert_eq!(report.jobs_processed, 6);
    assert_eq!(report.trades.len(), 12);
}
