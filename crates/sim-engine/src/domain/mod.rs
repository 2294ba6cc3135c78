//! Domain types for strategy simulation runs.

mod market;
mod strategy;
mod trade;

use serde::{Deserialize, Serialize};

pub use market::MarketDescriptor;
pub use strategy::StrategyRef;
pub use trade::Trade;

/// One unit of simulation work: a strategy evaluated against one market.
///
/// Immutable once enqueued; owned by the queue until a single worker dequeues
/// it for the duration of the simulation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SimJob {
    /// Strategy under test.
    pub strategy: StrategyRef,
    /// Market the strategy is evaluated against.
    pub market: MarketDescriptor,
}

impl SimJob {
    /// Create a job for a strategy-market pair.
    #[must_use]
    pub fn new(strategy: StrategyRef, market: MarketDescriptor) -> Self {
        Self { strategy, market }
    }

    /// Short `strategy/market` label for logs.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{}/{}", self.strategy.name, self.market.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_label() {
        let job = SimJob::new(
            StrategyRef::new("Trend Pullback"),
            MarketDescriptor::new("FXCM", "EUR/USD"),
        );

        assert_eq!(job.label(), "Trend Pullback/EUR/USD");
    }
}
