//! Spread capture: the quoted spread relative to price.

use arbsim_core::{LedgerField, TradeRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct SpreadCaptureRule;

impl SpreadCaptureRule {
    pub const FIELDS: &'static [LedgerField] = &[LedgerField::Price, LedgerField::Spread];

    /// `spread / price`, 0 at a zero price.
    pub fn score(&self, trade: &TradeRecord) -> f64 {
        if trade.price <= 0.0 {
            return 0.0;
        }
        trade.spread / trade.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::{Action, AgentId};

    #[test]
    fn relative_spread() {
        let mut t = TradeRecord::bare(1, AgentId(0), Action::Buy, 1, 100.0);
        t.spread = 2.0;
        assert_eq!(SpreadCaptureRule.score(&t), 0.02);
        t.price = 0.0;
        assert_eq!(SpreadCaptureRule.score(&t), 0.0);
    }
}
