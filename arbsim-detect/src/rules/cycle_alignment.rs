//! Cycle alignment: trading on fixed offsets of a known market cycle.

use arbsim_core::{LedgerField, TradeRecord};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct CycleAlignmentRule {
    cycle_length: u64,
    offsets: BTreeSet<u64>,
}

impl CycleAlignmentRule {
    pub const FIELDS: &'static [LedgerField] = &[LedgerField::Tick];

    /// A zero cycle length is treated as 1.
    pub fn new(cycle_length: u64, offsets: impl IntoIterator<Item = u64>) -> Self {
        let cycle_length = cycle_length.max(1);
        Self {
            cycle_length,
            offsets: offsets.into_iter().map(|o| o % cycle_length).collect(),
        }
    }

    pub fn score(&self, trade: &TradeRecord) -> f64 {
        if self.offsets.contains(&(trade.tick % self.cycle_length)) {
            1.0
        } else {
            0.0
        }
    }
}
