//! Round-trip profit: quick, profitable open-then-close sequences.
//!
//! Per agent the rule is either flat or holds an open position with its
//! cost basis. Trade value is the cash that actually changed hands, falling
//! back to `units * price` when the ledger carries no cash snapshots.
//!
//! A full close flags when total realized profit is positive, exceeds
//! `profit_threshold` times the capital invested over the round trip, and
//! the position was held at most `time_window` ticks.

use arbsim_core::{Action, AgentId, LedgerField, TradeRecord};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct OpenPosition {
    units: u64,
    cost_basis: f64,
    invested: f64,
    realized: f64,
    entry_tick: u64,
}

/// Ticks to flag after a qualifying close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTripFlags {
    pub entry_tick: u64,
    pub close_tick: u64,
}

#[derive(Debug, Clone, Default)]
pub struct RoundTripProfitRule {
    profit_threshold: f64,
    time_window: u64,
    open: HashMap<AgentId, OpenPosition>,
}

impl RoundTripProfitRule {
    pub const FIELDS: &'static [LedgerField] = &[
        LedgerField::Tick,
        LedgerField::AgentId,
        LedgerField::Action,
        LedgerField::Units,
        LedgerField::Price,
        LedgerField::CashBefore,
        LedgerField::CashAfter,
    ];

    pub fn new(profit_threshold: f64, time_window: u64) -> Self {
        Self {
            profit_threshold,
            time_window,
            open: HashMap::new(),
        }
    }

    pub fn is_open(&self, agent: AgentId) -> bool {
        self.open.contains_key(&agent)
    }

    fn trade_value(trade: &TradeRecord) -> f64 {
        let moved = (trade.cash_after - trade.cash_before).abs();
        if moved > 0.0 {
            moved
        } else {
            trade.units as f64 * trade.price
        }
    }

    pub fn observe(&mut self, trade: &TradeRecord) -> Option<RoundTripFlags> {
        if trade.units == 0 {
            return None;
        }
        let value = Self::trade_value(trade);

        match trade.action {
            Action::Buy => {
                let pos = self.open.entry(trade.agent_id).or_insert(OpenPosition {
                    units: 0,
                    cost_basis: 0.0,
                    invested: 0.0,
                    realized: 0.0,
                    entry_tick: trade.tick,
                });
                pos.units = pos.units.saturating_add(trade.units);
                pos.cost_basis += value;
                pos.invested += value;
                None
            }
            Action::Sell => {
                let pos = self.open.get_mut(&trade.agent_id)?;
                let avg_cost = pos.cost_basis / pos.units as f64;

                if trade.units < pos.units {
                    pos.realized += value - avg_cost * trade.units as f64;
                    pos.cost_basis -= avg_cost * trade.units as f64;
                    pos.units -= trade.units;
                    return None;
                }

                // Oversized sells only count the part that closes the position.
                let proceeds = value * pos.units as f64 / trade.units as f64;
                let realized = pos.realized + proceeds - pos.cost_basis;
                let held = trade.tick.saturating_sub(pos.entry_tick);
                let invested = pos.invested;
                let entry_tick = pos.entry_tick;
                self.open.remove(&trade.agent_id);

                let qualifies = realized > 0.0
                    && realized > self.profit_threshold * invested
                    && held <= self.time_window;
                qualifies.then_some(RoundTripFlags {
                    entry_tick,
                    close_tick: trade.tick,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trade(tick: u64, action: Action, units: u64, cash: (f64, f64)) -> TradeRecord {
        let mut t = TradeRecord::bare(tick, AgentId(0), action, units, 100.0);
        t.cash_before = cash.0;
        t.cash_after = cash.1;
        t
    }

    #[test]
    fn flags_profitable_quick_round_trip() {
        let mut rule = RoundTripProfitRule::new(0.0, 1);
        assert_eq!(rule.observe(&trade(1, Action::Buy, 5, (1000.0, 490.0))), None);
        assert!(rule.is_open(AgentId(0)));
        let flags = rule.observe(&trade(2, Action::Sell, 5, (490.0, 1005.0)));
        assert_eq!(
            flags,
            Some(RoundTripFlags {
                entry_tick: 1,
                close_tick: 2
            })
        );
        assert!(!rule.is_open(AgentId(0)));
    }

    #[test]
    fn losing_round_trip_not_flagged() {
        let mut rule = RoundTripProfitRule::new(-1.0, 100);
        rule.observe(&trade(1, Action::Buy, 5, (1000.0, 490.0)));
        assert_eq!(rule.observe(&trade(2, Action::Sell, 5, (490.0, 990.0))), None);
    }

    #[test]
    fn slow_round_trip_not_flagged() {
        let mut rule = RoundTripProfitRule::new(0.0, 3);
        rule.observe(&trade(1, Action::Buy, 5, (1000.0, 490.0)));
        assert_eq!(rule.observe(&trade(9, Action::Sell, 5, (490.0, 1100.0))), None);
    }

    #[test]
    fn partial_close_keeps_entry_tick() {
        let mut rule = RoundTripProfitRule::new(0.0, 10);
        rule.observe(&trade(1, Action::Buy, 4, (1000.0, 600.0)));
        assert_eq!(rule.observe(&trade(2, Action::Sell, 2, (600.0, 810.0))), None);
        assert!(rule.is_open(AgentId(0)));
        let flags = rule.observe(&trade(3, Action::Sell, 2, (810.0, 1000.0)));
        // realized: (210 - 200) + (190 - 200) = 0, not strictly positive
        assert_eq!(flags, None);

        rule.observe(&trade(5, Action::Buy, 4, (1000.0, 600.0)));
        rule.observe(&trade(6, Action::Sell, 2, (600.0, 810.0)));
        let flags = rule.observe(&trade(7, Action::Sell, 2, (810.0, 1020.0)));
        assert_eq!(
            flags,
            Some(RoundTripFlags {
                entry_tick: 5,
                close_tick: 7
            })
        );
    }

    #[test]
    fn buys_average_into_cost_basis() {
        let mut rule = RoundTripProfitRule::new(0.05, 10);
        rule.observe(&trade(1, Action::Buy, 1, (1000.0, 900.0)));
        rule.observe(&trade(2, Action::Buy, 1, (900.0, 780.0)));
        // invested 220, profit 10 < 5% of 220
        assert_eq!(rule.observe(&trade(3, Action::Sell, 2, (780.0, 1010.0))), None);
    }

    #[test]
    fn oversized_position_saturates() {
        let mut rule = RoundTripProfitRule::new(0.0, 10);
        rule.observe(&trade(1, Action::Buy, u64::MAX, (0.0, 0.0)));
        assert_eq!(rule.observe(&trade(2, Action::Buy, 5, (0.0, 0.0))), None);
        assert!(rule.is_open(AgentId(0)));
    }

    #[test]
    fn sell_while_flat_ignored() {
        let mut rule = RoundTripProfitRule::new(0.0, 10);
        assert_eq!(rule.observe(&trade(1, Action::Sell, 3, (0.0, 300.0))), None);
        assert!(!rule.is_open(AgentId(0)));
    }

    #[test]
    fn falls_back_to_price_without_cash_columns() {
        let mut rule = RoundTripProfitRule::new(0.0, 10);
        let buy = TradeRecord::bare(1, AgentId(0), Action::Buy, 2, 100.0);
        let sell = TradeRecord::bare(2, AgentId(0), Action::Sell, 2, 103.0);
        rule.observe(&buy);
        assert!(rule.observe(&sell).is_some());
    }
}
