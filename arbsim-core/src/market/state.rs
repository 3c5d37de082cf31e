use crate::domain::{Action, AgentId};
use serde::{Deserialize, Serialize};

/// Bias-cycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BiasState {
    #[default]
    NoBias,
    BiasUp,
    BiasDown,
}

impl BiasState {
    pub fn from_direction(direction: i8) -> Self {
        match direction.signum() {
            1 => BiasState::BiasUp,
            -1 => BiasState::BiasDown,
            _ => BiasState::NoBias,
        }
    }

    /// -1, 0 or +1.
    pub fn direction(self) -> i8 {
        match self {
            BiasState::NoBias => 0,
            BiasState::BiasUp => 1,
            BiasState::BiasDown => -1,
        }
    }

    pub fn is_active(self) -> bool {
        self != BiasState::NoBias
    }
}

/// Mutable market state. Owned by the simulation, mutated by the clock and
/// the execution engine only.
#[derive(Debug, Clone)]
pub struct MarketState {
    pub tick: u64,
    pub price: f64,
    /// Price at the start of the current tick, before the random step.
    pub last_price: f64,
    pub price_impact: f64,
    pub bias: BiasState,
    pub baseline_price: f64,
    /// End-of-tick prices, starting with the initial price at index 0.
    pub price_history: Vec<f64>,
}

impl MarketState {
    pub fn new(initial_price: f64, price_impact: f64) -> Self {
        Self {
            tick: 0,
            price: initial_price,
            last_price: initial_price,
            price_impact,
            bias: BiasState::NoBias,
            baseline_price: initial_price,
            price_history: vec![initial_price],
        }
    }
}

/// What a peer did last tick, as seen by imitation policies.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeerOutcome {
    pub agent_id: AgentId,
    pub last_trade: Option<(Action, u64)>,
    /// Change in mark-to-market wealth over the tick.
    pub wealth_change: f64,
}

/// Read-only view of the market handed to strategy policies.
///
/// `bias` and `cycle_onset` are insider information: only the arbitrage
/// policy reads them.
#[derive(Debug, Clone, Copy)]
pub struct MarketSnapshot<'a> {
    pub tick: u64,
    pub price: f64,
    pub last_price: f64,
    pub price_impact: f64,
    pub price_history: &'a [f64],
    pub peers: &'a [PeerOutcome],
    pub bias: BiasState,
    pub cycle_onset: bool,
}

impl<'a> MarketSnapshot<'a> {
    pub fn new(state: &'a MarketState, peers: &'a [PeerOutcome], cycle_onset: bool) -> Self {
        Self {
            tick: state.tick,
            price: state.price,
            last_price: state.last_price,
            price_impact: state.price_impact,
            price_history: &state.price_history,
            peers,
            bias: state.bias,
            cycle_onset,
        }
    }
}
