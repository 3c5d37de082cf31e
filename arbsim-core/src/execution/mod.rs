//! Execution engine: unit-by-unit fills against the walking price.
//!
//! Every unit moves the market by the impact step, so larger orders pay
//! progressively worse prices. Orders degrade to partial fills when the
//! agent runs out of cash or holdings; they never fail.

pub mod fill;

pub use fill::Fill;

use crate::domain::{Action, Agent};
use crate::market::MarketState;
use crate::strategy::TradeIntent;

/// Stateless; the impact step lives on the market state.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExecutionEngine;

impl ExecutionEngine {
    pub fn new() -> Self {
        Self
    }

    /// Fill `intent` for `agent`, mutating cash, holdings and price.
    ///
    /// Returns `None` for holds and for intents that filled zero units.
    pub fn execute(
        &self,
        intent: TradeIntent,
        agent: &mut Agent,
        market: &mut MarketState,
    ) -> Option<Fill> {
        let action = intent.action()?;
        let requested = intent.units();
        let start_price = market.price;
        let cash_before = agent.cash;
        let holdings_before = agent.holdings;

        let filled = match action {
            Action::Buy => self.buy(requested, agent, market),
            Action::Sell => self.sell(requested, agent, market),
        };
        if filled == 0 {
            return None;
        }

        Some(Fill {
            action,
            units: filled,
            start_price,
            end_price: market.price,
            cash_before,
            cash_after: agent.cash,
            holdings_before,
            holdings_after: agent.holdings,
        })
    }

    fn buy(&self, requested: u64, agent: &mut Agent, market: &mut MarketState) -> u64 {
        let mut filled = 0;
        while filled < requested && market.price > 0.0 && agent.cash >= market.price {
            agent.cash -= market.price;
            agent.holdings += 1;
            market.price += market.price_impact;
            filled += 1;
        }
        filled
    }

    fn sell(&self, requested: u64, agent: &mut Agent, market: &mut MarketState) -> u64 {
        let target = requested.min(agent.holdings);
        let mut filled = 0;
        while filled < target {
            agent.cash += market.price;
            agent.holdings -= 1;
            market.price = (market.price - market.price_impact).max(0.0);
            filled += 1;
        }
        filled
    }
}
