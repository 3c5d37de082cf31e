//! Inventory turnover: trade size relative to inventory already held.

use arbsim_core::{LedgerField, TradeRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct InventoryTurnoverRule;

impl InventoryTurnoverRule {
    pub const FIELDS: &'static [LedgerField] =
        &[LedgerField::Units, LedgerField::HoldingsBefore];

    /// `units / (units + holdings_before)`; 0 when both are zero.
    pub fn score(&self, trade: &TradeRecord) -> f64 {
        let units = trade.units as f64;
        let total = units + trade.holdings_before as f64;
        if total == 0.0 {
            return 0.0;
        }
        units / total
    }
}
