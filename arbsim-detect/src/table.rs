//! Suspicion table: one probability per (tick, agent), gapless over the
//! ledger's tick range, agents in ascending id order.

use crate::index::LedgerIndex;
use arbsim_core::AgentId;

#[derive(Debug, Clone, PartialEq)]
pub struct SuspicionTable {
    agents: Vec<AgentId>,
    first_tick: u64,
    rows: usize,
    values: Vec<f64>,
}

impl SuspicionTable {
    /// All-zero table shaped after `index`. The index caps ticks × agents at
    /// [`MAX_CELLS`](crate::index::MAX_CELLS).
    pub fn zeroed(index: &LedgerIndex) -> Self {
        let (first_tick, rows) = match index.tick_range() {
            Some((lo, hi)) => (lo, (hi - lo + 1) as usize),
            None => (0, 0),
        };
        let agents = index.agents().to_vec();
        Self {
            values: vec![0.0; rows * agents.len()],
            agents,
            first_tick,
            rows,
        }
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Ticks covered, in order.
    pub fn ticks(&self) -> impl Iterator<Item = u64> {
        self.first_tick..self.first_tick + self.rows as u64
    }

    fn slot(&self, agent: AgentId, tick: u64) -> Option<usize> {
        let row = usize::try_from(tick.checked_sub(self.first_tick)?).ok()?;
        if row >= self.rows {
            return None;
        }
        let col = self.agents.binary_search(&agent).ok()?;
        Some(row * self.agents.len() + col)
    }

    pub fn get(&self, agent: AgentId, tick: u64) -> Option<f64> {
        self.slot(agent, tick).map(|i| self.values[i])
    }

    /// Set a cell. Out-of-range cells are ignored.
    pub fn set(&mut self, agent: AgentId, tick: u64, value: f64) {
        if let Some(i) = self.slot(agent, tick) {
            self.values[i] = value;
        }
    }

    /// `(tick, probabilities in agent order)` for each tick.
    pub fn rows(&self) -> impl Iterator<Item = (u64, &[f64])> + '_ {
        let width = self.agents.len().max(1);
        self.ticks().zip(
            self.values
                .chunks(width)
                .chain(std::iter::repeat(&[][..]))
                .take(self.rows),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbsim_core::{Action, TradeRecord};

    fn index() -> LedgerIndex {
        LedgerIndex::build(&[
            TradeRecord::bare(2, AgentId(4), Action::Buy, 1, 10.0),
            TradeRecord::bare(5, AgentId(1), Action::Sell, 1, 10.0),
        ])
        .unwrap()
    }

    #[test]
    fn gapless_zeroed_shape() {
        let table = SuspicionTable::zeroed(&index());
        assert_eq!(table.ticks().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
        assert_eq!(table.agents(), &[AgentId(1), AgentId(4)]);
        assert!(table.rows().all(|(_, row)| row == [0.0, 0.0]));
    }

    #[test]
    fn set_and_get() {
        let mut table = SuspicionTable::zeroed(&index());
        table.set(AgentId(4), 3, 0.75);
        assert_eq!(table.get(AgentId(4), 3), Some(0.75));
        assert_eq!(table.get(AgentId(1), 3), Some(0.0));
        assert_eq!(table.get(AgentId(9), 3), None);
        assert_eq!(table.get(AgentId(4), 6), None);
        table.set(AgentId(4), 99, 1.0);
        assert_eq!(table.rows().count(), 4);
    }

    #[test]
    fn empty_index_empty_table() {
        let table = SuspicionTable::zeroed(&LedgerIndex::build(&[]).unwrap());
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
    }
}
