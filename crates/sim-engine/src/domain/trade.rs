//! Simulated trades produced by strategy runs.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One simulated trade.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique trade identifier.
    pub id: Uuid,
    /// Strategy that produced the trade.
    pub strategy: String,
    /// Market the trade was taken on.
    pub market: String,
    /// When the position was opened.
    pub opened_at: DateTime<Utc>,
    /// When the position was closed; `None` while still open at sim end.
    pub closed_at: Option<DateTime<Utc>>,
    /// Realized R-multiple; `None` when the trade never resolved.
    pub r_multiple: Option<Decimal>,
}

impl Trade {
    /// Create a closed trade with a realized R-multiple.
    #[must_use]
    pub fn closed(
        strategy: impl Into<String>,
        market: impl Into<String>,
        opened_at: DateTime<Utc>,
        closed_at: DateTime<Utc>,
        r_multiple: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            strategy: strategy.into(),
            market: market.into(),
            opened_at,
            closed_at: Some(closed_at),
            r_multiple: Some(r_multiple),
        }
    }

    /// Whether the trade resolved with a positive R-multiple.
    #[must_use]
    pub fn is_winner(&self) -> bool {
        self.r_multiple.is_some_and(|r| r > Decimal::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_winner_classification() {
        let now = Utc::now();
        let winner = Trade::closed("s", "m", now, now, dec!(1.5));
        let loser = Trade::closed("s", "m", now, now, dec!(-1));

        assert!(winner.is_winner());
        assert!(!loser.is_winner());
    }
}
