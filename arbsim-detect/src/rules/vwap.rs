//! VWAP arbitrage: buying below, or selling above, the running market VWAP.
//!
//! The VWAP covers every trade seen so far, all agents included. Each trade
//! is scored against the VWAP before it, then folded in.

use arbsim_core::{Action, LedgerField, TradeRecord};

#[derive(Debug, Clone, Default)]
pub struct VwapArbitrageRule {
    notional: f64,
    volume: f64,
}

impl VwapArbitrageRule {
    pub const FIELDS: &'static [LedgerField] =
        &[LedgerField::Action, LedgerField::Units, LedgerField::Price];

    pub fn vwap(&self) -> Option<f64> {
        (self.volume > 0.0).then(|| self.notional / self.volume)
    }

    pub fn observe(&mut self, trade: &TradeRecord) -> f64 {
        let score = match self.vwap() {
            Some(vwap) if vwap > 0.0 => match trade.action {
                Action::Buy if trade.price < vwap => (vwap - trade.price) / vwap,
                Action::Sell if trade.price > vwap => (trade.price - vwap) / vwap,
                _ => 0.0,
            },
            _ => 0.0,
        };
        self.notional += trade.price * trade.units as f64;
        self.volume += trade.units as f64;
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::AgentId;

    fn t(action: Action, units: u64, price: f64) -> TradeRecord {
        TradeRecord::bare(1, AgentId(0), action, units, price)
    }

    #[test]
    fn first_trade_scores_zero() {
        let mut rule = VwapArbitrageRule::default();
        assert_eq!(rule.observe(&t(Action::Buy, 1, 100.0)), 0.0);
        assert_eq!(rule.vwap(), Some(100.0));
    }

    #[test]
    fn buy_below_and_sell_above() {
        let mut rule = VwapArbitrageRule::default();
        rule.observe(&t(Action::Buy, 3, 100.0));
        rule.observe(&t(Action::Sell, 1, 104.0));
        // vwap 101
        assert!((rule.observe(&t(Action::Buy, 1, 96.96)) - 0.04).abs() < 1e-9);
    }

    #[test]
    fn wrong_side_scores_zero() {
        let mut rule = VwapArbitrageRule::default();
        rule.observe(&t(Action::Buy, 1, 100.0));
        assert_eq!(rule.observe(&t(Action::Sell, 1, 90.0)), 0.0);
        assert_eq!(rule.observe(&t(Action::Buy, 1, 120.0)), 0.0);
    }
}
