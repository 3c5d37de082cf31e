//! Predictive trade: the price moved the trader's way soon after.
//!
//! Looks ahead up to `window` ticks in the closing-price index and flags the
//! first tick showing a favorable move of at least `threshold` (fractional).
//! Needs the whole ledger up front.

use crate::index::LedgerIndex;
use arbsim_core::{Action, LedgerField, TradeRecord};

#[derive(Debug, Clone)]
pub struct PredictiveTradeRule {
    window: u64,
    threshold: f64,
}

impl PredictiveTradeRule {
    pub const FIELDS: &'static [LedgerField] = &[
        LedgerField::Tick,
        LedgerField::AgentId,
        LedgerField::Action,
        LedgerField::Price,
    ];

    pub fn new(window: u64, threshold: f64) -> Self {
        Self { window, threshold }
    }

    /// Zero-priced trades are never flagged.
    pub fn flags(&self, trade: &TradeRecord, index: &LedgerIndex) -> bool {
        if trade.price <= 0.0 {
            return false;
        }
        (1..=self.window).any(|ahead| {
            let Some(future) = index.close_price(trade.tick + ahead) else {
                return false;
            };
            let change = (future - trade.price) / trade.price;
            match trade.action {
                Action::Buy => change >= self.threshold,
                Action::Sell => -change >= self.threshold,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::AgentId;

    fn ledger() -> Vec<TradeRecord> {
        vec![
            TradeRecord::bare(1, AgentId(0), Action::Buy, 1, 100.0),
            TradeRecord::bare(2, AgentId(1), Action::Sell, 1, 100.5),
            TradeRecord::bare(4, AgentId(1), Action::Buy, 1, 104.0),
            TradeRecord::bare(9, AgentId(1), Action::Buy, 1, 90.0),
        ]
    }

    #[test]
    fn buy_before_rise_flagged() {
        let trades = ledger();
        let index = LedgerIndex::build(&trades).unwrap();
        let rule = PredictiveTradeRule::new(3, 0.03);
        assert!(rule.flags(&trades[0], &index));
        // rise arrives 3 ticks out, beyond a window of 2
        assert!(!PredictiveTradeRule::new(2, 0.03).flags(&trades[0], &index));
    }

    #[test]
    fn sell_before_rise_not_flagged() {
        let trades = ledger();
        let index = LedgerIndex::build(&trades).unwrap();
        assert!(!PredictiveTradeRule::new(5, 0.01).flags(&trades[1], &index));
    }

    #[test]
    fn sell_before_fall_flagged_via_carried_price() {
        let trades = ledger();
        let index = LedgerIndex::build(&trades).unwrap();
        let sell = TradeRecord::bare(4, AgentId(2), Action::Sell, 1, 104.0);
        assert!(PredictiveTradeRule::new(5, 0.1).flags(&sell, &index));
        assert!(!PredictiveTradeRule::new(4, 0.1).flags(&sell, &index));
    }

    #[test]
    fn no_future_prices_past_last_tick() {
        let trades = ledger();
        let index = LedgerIndex::build(&trades).unwrap();
        assert!(!PredictiveTradeRule::new(10, 0.0).flags(&trades[3], &index));
    }

    #[test]
    fn zero_price_never_flags() {
        let trades = ledger();
        let index = LedgerIndex::build(&trades).unwrap();
        let free = TradeRecord::bare(1, AgentId(3), Action::Buy, 1, 0.0);
        assert!(!PredictiveTradeRule::new(5, 0.0).flags(&free, &index));
    }
}
