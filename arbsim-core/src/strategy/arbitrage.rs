//! Informed trader with read access to the bias clock.
//!
//! - Onset, bias up: spend `aggressiveness` of affordable units.
//! - Onset, bias down: dump `aggressiveness` of holdings (at least one unit).
//! - Offset of an up bias: sell everything.
//! - Offset of a down bias: buy the dip with `aggressiveness` of affordable units.
//!
//! Offset means the bias was active at this agent's previous decision and
//! has since ended: either it is off now, or a new cycle opened, in which
//! case the old one was closed at the boundary in between. An offset
//! decision overrides an onset decision on the same tick.

use super::TradeIntent;
use crate::domain::{Action, AgentView};
use crate::market::{BiasState, MarketSnapshot};
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Arbitrage {
    pub aggressiveness: f64,
    last_bias: BiasState,
}

impl Arbitrage {
    pub fn new(aggressiveness: f64) -> Self {
        Self {
            aggressiveness,
            last_bias: BiasState::NoBias,
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(0.8..1.0))
    }

    fn scaled(&self, units: u64) -> u64 {
        (self.aggressiveness * units as f64).floor() as u64
    }

    pub fn decide(&mut self, agent: &AgentView, market: &MarketSnapshot<'_>) -> TradeIntent {
        let mut intent = TradeIntent::Hold;

        if market.cycle_onset && market.bias.is_active() {
            intent = match market.bias {
                BiasState::BiasUp => TradeIntent::new(
                    Action::Buy,
                    self.scaled(agent.affordable_units(market.price)),
                ),
                BiasState::BiasDown if agent.holdings > 0 => {
                    TradeIntent::new(Action::Sell, self.scaled(agent.holdings).max(1))
                }
                _ => TradeIntent::Hold,
            };
        }

        let ended = !market.bias.is_active() || market.cycle_onset;
        if self.last_bias.is_active() && ended {
            match self.last_bias {
                BiasState::BiasUp if agent.holdings > 0 => {
                    intent = TradeIntent::Sell(agent.holdings);
                }
                BiasState::BiasDown => {
                    let units = self.scaled(agent.affordable_units(market.price));
                    if units > 0 {
                        intent = TradeIntent::Buy(units);
                    }
                }
                _ => {}
            }
        }

        self.last_bias = market.bias;
        intent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::AgentId;
    use crate::strategy::test_support::snapshot;

    fn agent(cash: f64, holdings: u64) -> AgentView {
        AgentView {
            id: AgentId(0),
            cash,
            holdings,
        }
    }

    fn biased<'a>(tick: u64, price: f64, bias: BiasState, onset: bool, h: &'a [f64]) -> MarketSnapshot<'a> {
        let mut snap = snapshot(tick, price, price, h);
        snap.bias = bias;
        snap.cycle_onset = onset;
        snap
    }

    #[test]
    fn buys_at_up_onset() {
        let mut p = Arbitrage::new(0.9);
        let h = [100.0];
        let intent = p.decide(&agent(1000.0, 0), &biased(1, 100.0, BiasState::BiasUp, true, &h));
        assert_eq!(intent, TradeIntent::Buy(9));
    }

    #[test]
    fn sells_at_down_onset_at_least_one() {
        let mut p = Arbitrage::new(0.8);
        let h = [100.0];
        let intent = p.decide(&agent(0.0, 1), &biased(1, 100.0, BiasState::BiasDown, true, &h));
        assert_eq!(intent, TradeIntent::Sell(1));
    }

    #[test]
    fn down_onset_without_holdings_holds() {
        let mut p = Arbitrage::new(0.8);
        let h = [100.0];
        let intent = p.decide(&agent(500.0, 0), &biased(1, 100.0, BiasState::BiasDown, true, &h));
        assert_eq!(intent, TradeIntent::Hold);
    }

    #[test]
    fn takes_profit_when_up_bias_ends() {
        let mut p = Arbitrage::new(0.9);
        let h = [100.0];
        p.decide(&agent(1000.0, 0), &biased(1, 100.0, BiasState::BiasUp, true, &h));
        let mid = p.decide(&agent(100.0, 9), &biased(2, 101.0, BiasState::BiasUp, false, &h));
        assert_eq!(mid, TradeIntent::Hold);
        let exit = p.decide(&agent(100.0, 9), &biased(3, 111.0, BiasState::NoBias, false, &h));
        assert_eq!(exit, TradeIntent::Sell(9));
    }

    #[test]
    fn buys_dip_when_down_bias_ends() {
        let mut p = Arbitrage::new(1.0);
        let h = [100.0];
        p.decide(&agent(0.0, 5), &biased(1, 100.0, BiasState::BiasDown, true, &h));
        let exit = p.decide(&agent(450.0, 0), &biased(4, 89.0, BiasState::NoBias, false, &h));
        assert_eq!(exit, TradeIntent::Buy(5));
    }

    #[test]
    fn boundary_close_reverses_before_next_onset() {
        let mut p = Arbitrage::new(0.9);
        let h = [100.0];
        p.decide(&agent(1000.0, 0), &biased(1, 100.0, BiasState::BiasUp, true, &h));
        p.decide(&agent(100.0, 9), &biased(10, 105.0, BiasState::BiasUp, false, &h));
        // The up cycle closed at the end of tick 10; tick 11 opens another up cycle.
        let next = p.decide(&agent(100.0, 9), &biased(11, 105.5, BiasState::BiasUp, true, &h));
        assert_eq!(next, TradeIntent::Sell(9));
    }

    #[test]
    fn boundary_close_of_down_cycle_buys_dip() {
        let mut p = Arbitrage::new(1.0);
        let h = [100.0];
        p.decide(&agent(0.0, 5), &biased(1, 100.0, BiasState::BiasDown, true, &h));
        p.decide(&agent(475.0, 0), &biased(10, 95.0, BiasState::BiasDown, false, &h));
        let next = p.decide(&agent(475.0, 0), &biased(11, 95.0, BiasState::BiasDown, true, &h));
        assert_eq!(next, TradeIntent::Buy(5));
    }

    #[test]
    fn onset_from_flat_is_not_an_offset() {
        let mut p = Arbitrage::new(1.0);
        let h = [100.0];
        p.decide(&agent(1000.0, 0), &biased(5, 100.0, BiasState::NoBias, false, &h));
        let next = p.decide(&agent(1000.0, 0), &biased(11, 100.0, BiasState::BiasUp, true, &h));
        assert_eq!(next, TradeIntent::Buy(10));
    }

    #[test]
    fn zero_price_never_buys() {
        let mut p = Arbitrage::new(1.0);
        let h = [100.0];
        let intent = p.decide(&agent(1000.0, 0), &biased(1, 0.0, BiasState::BiasUp, true, &h));
        assert_eq!(intent, TradeIntent::Hold);
    }
}
