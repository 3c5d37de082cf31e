//! Price impact: trades that lean in the direction the mid just moved.

use arbsim_core::{Action, LedgerField, TradeRecord};

#[derive(Debug, Clone, Default)]
pub struct PriceImpactRule {
    prev_mid: Option<f64>,
}

impl PriceImpactRule {
    pub const FIELDS: &'static [LedgerField] = &[LedgerField::Action, LedgerField::Mid];

    /// Relative mid move since the previous trade, counted only when it
    /// agrees with the trade direction. Updates the previous mid afterwards.
    pub fn observe(&mut self, trade: &TradeRecord) -> f64 {
        let score = match self.prev_mid {
            Some(prev) if prev > 0.0 => {
                let moved = (trade.mid - prev) / prev;
                match trade.action {
                    Action::Buy if moved > 0.0 => moved,
                    Action::Sell if moved < 0.0 => -moved,
                    _ => 0.0,
                }
            }
            _ => 0.0,
        };
        self.prev_mid = Some(trade.mid);
        score
    }
}
