use super::AgentId;
use crate::strategy::StrategyPolicy;

/// A trading agent: resources plus the policy that decides what to do with them.
///
/// Cash and holdings are only mutated by the execution engine, which never
/// lets either go negative.
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: AgentId,
    pub cash: f64,
    pub holdings: u64,
    pub policy: StrategyPolicy,
}

impl Agent {
    pub fn new(id: AgentId, cash: f64, policy: StrategyPolicy) -> Self {
        Self {
            id,
            cash,
            holdings: 0,
            policy,
        }
    }

    /// Mark-to-market value at `price`.
    pub fn wealth(&self, price: f64) -> f64 {
        self.cash + self.holdings as f64 * price
    }

    pub fn view(&self) -> AgentView {
        AgentView {
            id: self.id,
            cash: self.cash,
            holdings: self.holdings,
        }
    }
}

/// Read-only copy of an agent's resources, handed to policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgentView {
    pub id: AgentId,
    pub cash: f64,
    pub holdings: u64,
}

impl AgentView {
    /// Whole units affordable at `price`. Zero when the price is not positive.
    pub fn affordable_units(&self, price: f64) -> u64 {
        if price <= 0.0 || self.cash < price {
            return 0;
        }
        (self.cash / price).floor() as u64
    }
}
