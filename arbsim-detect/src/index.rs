//! Read-only index over a finalized ledger.
//!
//! - sorted, de-duplicated agent ids
//! - the covered tick range
//! - closing price per tick (last trade in the tick), carried forward across
//!   ticks without trades
//! - trade counts per (agent, tick)

use arbsim_core::{AgentId, TradeRecord};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use thiserror::Error;

/// Upper bound on ticks × agents. Closes and the suspicion table are dense
/// over the tick range.
pub const MAX_CELLS: u64 = 1 << 26;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    #[error("ledger ticks {first}..={last} across {agents} agents exceed the table cell limit")]
    RangeTooLarge { first: u64, last: u64, agents: usize },
}

#[derive(Debug, Clone, Default)]
pub struct LedgerIndex {
    agents: Vec<AgentId>,
    first_tick: u64,
    closes: Vec<f64>,
    trade_counts: HashMap<(AgentId, u64), usize>,
}

impl LedgerIndex {
    /// Build from trades in ledger order. Within a tick the last trade wins.
    ///
    /// Fails when the tick range times the agent count exceeds [`MAX_CELLS`].
    pub fn build(trades: &[TradeRecord]) -> Result<Self, IndexError> {
        if trades.is_empty() {
            return Ok(Self::default());
        }

        let mut agents = BTreeSet::new();
        let mut last_price = BTreeMap::new();
        let mut trade_counts = HashMap::new();
        for t in trades {
            agents.insert(t.agent_id);
            last_price.insert(t.tick, t.price);
            *trade_counts.entry((t.agent_id, t.tick)).or_insert(0) += 1;
        }

        // Non-empty, so both ends exist.
        let first_tick = last_price.keys().next().copied().unwrap_or(0);
        let last_tick = last_price.keys().next_back().copied().unwrap_or(first_tick);

        let span = (last_tick - first_tick)
            .checked_add(1)
            .filter(|&n| n.saturating_mul(agents.len() as u64) <= MAX_CELLS)
            .ok_or(IndexError::RangeTooLarge {
                first: first_tick,
                last: last_tick,
                agents: agents.len(),
            })?;

        let mut closes = Vec::with_capacity(span as usize);
        let mut carried = 0.0;
        for tick in first_tick..=last_tick {
            if let Some(&p) = last_price.get(&tick) {
                carried = p;
            }
            closes.push(carried);
        }

        Ok(Self {
            agents: agents.into_iter().collect(),
            first_tick,
            closes,
            trade_counts,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn agents(&self) -> &[AgentId] {
        &self.agents
    }

    /// Inclusive `(min_tick, max_tick)`, `None` for an empty ledger.
    pub fn tick_range(&self) -> Option<(u64, u64)> {
        if self.closes.is_empty() {
            return None;
        }
        Some((self.first_tick, self.first_tick + self.closes.len() as u64 - 1))
    }

    /// Closing price at `tick`, `None` outside the covered range.
    pub fn close_price(&self, tick: u64) -> Option<f64> {
        let offset = tick.checked_sub(self.first_tick)?;
        self.closes.get(usize::try_from(offset).ok()?).copied()
    }

    pub fn trade_count(&self, agent: AgentId, tick: u64) -> usize {
        self.trade_counts.get(&(agent, tick)).copied().unwrap_or(0)
    }
}
