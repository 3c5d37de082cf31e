//! Append-only trade ledger with enrichment.
//!
//! Each appended fill becomes a [`TradeRecord`] carrying:
//! - notional at the start price
//! - a synthetic quote one impact step either side of the start price
//! - trailing volatility over the last `volatility_window` observations
//! - a trailing moving average, once `ma_window` observations exist
//! - cumulative P&L against the agent's first observed mark-to-market value

pub mod rolling;

pub use rolling::RollingWindow;

use crate::config::LedgerConfig;
use crate::domain::{AgentId, TradeRecord};
use crate::execution::Fill;
use std::collections::HashMap;

#[derive(Debug, Clone)]
pub struct TradeLedger {
    volatility_window: usize,
    ma_window: usize,
    observations: RollingWindow,
    baselines: HashMap<AgentId, f64>,
    records: Vec<TradeRecord>,
}

impl TradeLedger {
    pub fn new(config: &LedgerConfig) -> Self {
        let volatility_window = config.volatility_window.max(1);
        let ma_window = config.ma_window.max(1);
        Self {
            volatility_window,
            ma_window,
            observations: RollingWindow::new(volatility_window.max(ma_window)),
            baselines: HashMap::new(),
            records: Vec::new(),
        }
    }

    /// Enrich and append a fill. `price_impact` is the market's impact step.
    pub fn append(
        &mut self,
        tick: u64,
        agent_id: AgentId,
        strategy: &str,
        fill: &Fill,
        price_impact: f64,
    ) -> &TradeRecord {
        let price = fill.start_price;
        let best_bid = price - price_impact;
        let best_ask = price + price_impact;

        self.observations.push(tick, price);
        let volatility = self.observations.population_std(self.volatility_window);
        let moving_average = self.observations.full_mean(self.ma_window);
        let ma_deviation = moving_average.map(|ma| price - ma);

        let baseline = *self
            .baselines
            .entry(agent_id)
            .or_insert(fill.cash_before + fill.holdings_before as f64 * price);
        let mark = fill.cash_after + fill.holdings_after as f64 * fill.end_price;

        self.records.push(TradeRecord {
            tick,
            agent_id,
            strategy: strategy.to_string(),
            action: fill.action,
            units: fill.units,
            price,
            notional: price * fill.units as f64,
            best_bid,
            best_ask,
            mid: (best_bid + best_ask) / 2.0,
            spread: best_ask - best_bid,
            volatility,
            moving_average,
            ma_deviation,
            cash_before: fill.cash_before,
            cash_after: fill.cash_after,
            holdings_before: fill.holdings_before,
            holdings_after: fill.holdings_after,
            cumulative_pnl: mark - baseline,
        });
        &self.records[self.records.len() - 1]
    }

    pub fn records(&self) -> &[TradeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<TradeRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Action;

    fn fill(action: Action, units: u64, start: f64, end: f64, cash: (f64, f64), hold: (u64, u64)) -> Fill {
        Fill {
            action,
            units,
            start_price: start,
            end_price: end,
            cash_before: cash.0,
            cash_after: cash.1,
            holdings_before: hold.0,
            holdings_after: hold.1,
        }
    }

    #[test]
    fn derives_quote_and_notional() {
        let mut ledger = TradeLedger::new(&LedgerConfig::default());
        let rec = ledger
            .append(
                1,
                AgentId(0),
                "momentum",
                &fill(Action::Buy, 5, 100.0, 105.0, (1000.0, 490.0), (0, 5)),
                1.0,
            )
            .clone();
        assert_eq!(rec.notional, 500.0);
        assert_eq!(rec.best_bid, 99.0);
        assert_eq!(rec.best_ask, 101.0);
        assert_eq!(rec.mid, 100.0);
        assert_eq!(rec.spread, 2.0);
        assert_eq!(rec.volatility, 0.0);
        assert_eq!(rec.moving_average, None);
        assert_eq!(rec.ma_deviation, None);
        assert_eq!(rec.strategy, "momentum");
    }

    #[test]
    fn pnl_against_first_observation() {
        let mut ledger = TradeLedger::new(&LedgerConfig::default());
        ledger.append(
            1,
            AgentId(3),
            "x",
            &fill(Action::Buy, 5, 100.0, 105.0, (1000.0, 490.0), (0, 5)),
            1.0,
        );
        let close = ledger
            .append(
                2,
                AgentId(3),
                "x",
                &fill(Action::Sell, 5, 105.0, 100.0, (490.0, 1005.0), (5, 0)),
                1.0,
            )
            .clone();
        assert_eq!(ledger.records()[0].cumulative_pnl, 15.0);
        assert_eq!(close.cumulative_pnl, 5.0);
    }

    #[test]
    fn moving_average_appears_after_full_window() {
        let config = LedgerConfig {
            volatility_window: 2,
            ma_window: 3,
        };
        let mut ledger = TradeLedger::new(&config);
        for (tick, price) in [(1, 10.0), (2, 20.0), (3, 30.0)] {
            ledger.append(
                tick,
                AgentId(0),
                "x",
                &fill(Action::Buy, 1, price, price, (100.0, 100.0 - price), (0, 1)),
                0.0,
            );
        }
        let recs = ledger.records();
        assert_eq!(recs[1].moving_average, None);
        assert_eq!(recs[2].moving_average, Some(20.0));
        assert_eq!(recs[2].ma_deviation, Some(10.0));
        // window of 2: {20, 30}
        assert_eq!(recs[2].volatility, 5.0);
    }

    #[test]
    fn same_tick_same_price_counted_once() {
        let config = LedgerConfig {
            volatility_window: 10,
            ma_window: 2,
        };
        let mut ledger = TradeLedger::new(&config);
        let f = fill(Action::Buy, 1, 50.0, 50.0, (100.0, 50.0), (0, 1));
        ledger.append(4, AgentId(0), "x", &f, 0.0);
        ledger.append(4, AgentId(1), "x", &f, 0.0);
        assert_eq!(ledger.records()[1].moving_average, None);
        assert_eq!(ledger.len(), 2);
    }
}
