//! Aggressiveness: how much of the available resource one trade used.
//!
//! Both rules saturate at 1.0 when the resource was zero going in.

use arbsim_core::{Action, LedgerField, TradeRecord};

#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveBuyRule;

impl AggressiveBuyRule {
    pub const FIELDS: &'static [LedgerField] = &[
        LedgerField::Action,
        LedgerField::CashBefore,
        LedgerField::CashAfter,
    ];

    /// Fraction of cash spent. `None` for sells.
    pub fn score(&self, trade: &TradeRecord) -> Option<f64> {
        if trade.action != Action::Buy {
            return None;
        }
        if trade.cash_before <= 0.0 {
            return Some(1.0);
        }
        let spent = trade.cash_before - trade.cash_after;
        Some((spent / trade.cash_before).clamp(0.0, 1.0))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggressiveSellRule;

impl AggressiveSellRule {
    pub const FIELDS: &'static [LedgerField] = &[
        LedgerField::Action,
        LedgerField::Units,
        LedgerField::HoldingsBefore,
    ];

    /// Fraction of holdings sold. `None` for buys.
    pub fn score(&self, trade: &TradeRecord) -> Option<f64> {
        if trade.action != Action::Sell {
            return None;
        }
        if trade.holdings_before == 0 {
            return Some(1.0);
        }
        Some((trade.units as f64 / trade.holdings_before as f64).min(1.0))
    }
}
