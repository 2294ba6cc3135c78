//! Headline statistics over a set of simulated trades.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::Trade;

/// Aggregate statistics for one simulation run.
///
/// Ratio fields are `None` when their denominator is empty (no resolved
/// trades, no winners, no losers). Trades without a realized R-multiple count
/// toward `total_trades` only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsSummary {
    /// Total number of trades, resolved or not.
    pub total_trades: u64,
    /// Sum of realized R-multiples.
    pub total_r: Decimal,
    /// Mean realized R-multiple per resolved trade.
    pub average_r_per_trade: Option<Decimal>,
    /// Percentage of resolved trades with a positive R-multiple.
    pub percent_success: Option<Decimal>,
    /// Mean R-multiple over winning trades.
    pub average_winning_rrr: Option<Decimal>,
    /// Mean R-multiple over losing trades.
    pub average_losing_rrr: Option<Decimal>,
}

impl ResultsSummary {
    /// Compute the summary for a set of trades.
    #[must_use]
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut winners: Vec<Decimal> = Vec::new();
        let mut losers: Vec<Decimal> = Vec::new();
        for trade in trades {
            let Some(r) = trade.r_multiple else { continue };
            if trade.is_winner() {
                winners.push(r);
            } else {
                losers.push(r);
            }
        }

        let resolved = winners.len() + losers.len();
        let total_r: Decimal = winners.iter().chain(losers.iter()).copied().sum();

        Self {
            total_trades: trades.len() as u64,
            total_r,
            average_r_per_trade: if resolved == 0 {
                None
            } else {
                Some(total_r / Decimal::from(resolved))
            },
            percent_success: if resolved == 0 {
                None
            } else {
                Some(Decimal::from(winners.len()) / Decimal::from(resolved) * Decimal::ONE_HUNDRED)
            },
            average_winning_rrr: mean(&winners),
            average_losing_rrr: mean(&losers),
        }
    }
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        None
    } else {
        let sum: Decimal = values.iter().copied().sum();
        Some(sum / Decimal::from(values.len()))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    use super::*;

    fn trade(r: Decimal) -> Trade {
        let now = Utc::now();
        Trade::closed("s", "m", now, now, r)
    }

    #[test]
    fn test_empty_run_has_no_ratios() {
        let summary = ResultsSummary::from_trades(&[]);

        assert_eq!(summary.total_trades, 0);
        assert_eq!(summary.total_r, Decimal::ZERO);
        assert!(summary.average_r_per_trade.is_none());
        assert!(summary.percent_success.is_none());
    }

    #[test]
    fn test_mixed_run_statistics() {
        let trades = vec![trade(dec!(2)), trade(dec!(1)), trade(dec!(-1)), trade(dec!(-1))];
        let summary = ResultsSummary::from_trades(&trades);

        assert_eq!(summary.total_trades, 4);
        assert_eq!(summary.total_r, dec!(1));
        assert_eq!(summary.average_r_per_trade, Some(dec!(0.25)));
        assert_eq!(summary.percent_success, Some(dec!(50)));
        assert_eq!(summary.average_winning_rrr, Some(dec!(1.5)));
        assert_eq!(summary.average_losing_rrr, Some(dec!(-1)));
    }

    #[test]
    fn test_zero_r_trade_counts_as_loser() {
        let summary = ResultsSummary::from_trades(&[trade(dec!(0)), trade(dec!(1))]);

        assert_eq!(summary.percent_success, Some(dec!(50)));
        assert_eq!(summary.average_losing_rrr, Some(dec!(0)));
    }

    #[test_case(&[dec!(1)], dec!(100); "all winners")]
    #[test_case(&[dec!(-1)], dec!(0); "all losers")]
    #[test_case(&[dec!(1), dec!(-1)], dec!(50); "half and half")]
    fn test_percent_success(rs: &[Decimal], expected: Decimal) {
        let trades: Vec<Trade> = rs.iter().map(|r| trade(*r)).collect();
        let summary = ResultsSummary::from_trades(&trades);

        assert_eq!(summary.percent_success, Some(expected));
    }

    #[test]
    fn test_unresolved_trades_count_only_toward_total() {
        let now = Utc::now();
        let open = Trade {
            id: uuid::Uuid::new_v4(),
            strategy: "s".to_string(),
            market: "m".to_string(),
            opened_at: now,
            closed_at: None,
            r_multiple: None,
        };
        let summary = ResultsSummary::from_trades(&[open, trade(dec!(2))]);

        assert_eq!(summary.total_trades, 2);
        assert_eq!(summary.average_r_per_trade, Some(dec!(2)));
    }
}
