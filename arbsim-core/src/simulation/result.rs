use crate::domain::{AgentId, TradeRecord};
use crate::market::BiasState;
use crate::strategy::StrategyKind;
use serde::{Deserialize, Serialize};

/// Market summary for one tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickSummary {
    pub tick: u64,
    /// Closing price, after every agent traded.
    pub price: f64,
    pub trades: usize,
    pub units_traded: u64,
    /// Bias in force while agents traded.
    pub bias: BiasState,
}

/// Final resources of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentWealth {
    pub agent_id: AgentId,
    pub strategy: StrategyKind,
    pub cash: f64,
    pub holdings: u64,
    pub wealth: f64,
}

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub seed: u64,
    pub run_id: String,
    pub ledger: Vec<TradeRecord>,
    pub ticks: Vec<TickSummary>,
    pub final_price: f64,
    pub final_wealth: Vec<AgentWealth>,
}

impl SimulationResult {
    pub fn total_units(&self) -> u64 {
        self.ticks.iter().map(|t| t.units_traded).sum()
    }
}
