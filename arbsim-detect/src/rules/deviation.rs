//! Deviation: buying below the moving average, selling above it.

use arbsim_core::{Action, LedgerField, TradeRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct DeviationRule;

impl DeviationRule {
    pub const FIELDS: &'static [LedgerField] = &[LedgerField::Action, LedgerField::MaDeviation];

    /// `min(|deviation|, 1)` on the favorable side, 0 on the other.
    /// `None` while the moving average is not yet populated.
    pub fn score(&self, trade: &TradeRecord) -> Option<f64> {
        let deviation = trade.ma_deviation?;
        let favorable = match trade.action {
            Action::Buy => deviation < 0.0,
            Action::Sell => deviation > 0.0,
        };
        Some(if favorable { deviation.abs().min(1.0) } else { 0.0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::AgentId;

    fn t(action: Action, deviation: Option<f64>) -> TradeRecord {
        let mut rec = TradeRecord::bare(1, AgentId(0), action, 1, 100.0);
        rec.ma_deviation = deviation;
        rec
    }

    #[test]
    fn favorable_side_scores_capped_magnitude() {
        assert_eq!(DeviationRule.score(&t(Action::Buy, Some(-0.4))), Some(0.4));
        assert_eq!(DeviationRule.score(&t(Action::Buy, Some(-3.0))), Some(1.0));
        assert_eq!(DeviationRule.score(&t(Action::Sell, Some(0.7))), Some(0.7));
    }

    #[test]
    fn unfavorable_side_scores_zero() {
        assert_eq!(DeviationRule.score(&t(Action::Buy, Some(2.0))), Some(0.0));
        assert_eq!(DeviationRule.score(&t(Action::Sell, Some(-2.0))), Some(0.0));
    }

    #[test]
    fn missing_average_is_silent() {
        assert_eq!(DeviationRule.score(&t(Action::Buy, None)), None);
    }
}
