//! Trade ledger record and its column schema.
//!
//! `TradeRecord` is the one record type shared by both halves of the system:
//! the simulator appends them, the detection engine reads them back (from
//! memory or from CSV). `LedgerField` names every column so detectors can
//! declare exactly which ones they depend on.

use super::AgentId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Buy,
    Sell,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Buy => "buy",
            Action::Sell => "sell",
        }
    }

    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            Action::Buy => 1.0,
            Action::Sell => -1.0,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "buy" => Ok(Action::Buy),
            "sell" => Ok(Action::Sell),
            other => Err(format!("unknown action '{other}'")),
        }
    }
}

/// One executed trade, enriched at append time.
///
/// `price` is the market price observed at the start of the fill sequence;
/// the cash and holdings snapshots bracket the whole sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub tick: u64,
    pub agent_id: AgentId,
    pub strategy: String,
    pub action: Action,
    pub units: u64,
    pub price: f64,
    pub notional: f64,
    pub best_bid: f64,
    pub best_ask: f64,
    pub mid: f64,
    pub spread: f64,
    pub volatility: f64,
    /// `None` until the ledger has seen a full moving-average window.
    pub moving_average: Option<f64>,
    pub ma_deviation: Option<f64>,
    pub cash_before: f64,
    pub cash_after: f64,
    pub holdings_before: u64,
    pub holdings_after: u64,
    pub cumulative_pnl: f64,
}

impl TradeRecord {
    /// A record carrying only the five core columns; enrichment defaults to zero.
    pub fn bare(tick: u64, agent_id: AgentId, action: Action, units: u64, price: f64) -> Self {
        Self {
            tick,
            agent_id,
            strategy: String::new(),
            action,
            units,
            price,
            notional: 0.0,
            best_bid: 0.0,
            best_ask: 0.0,
            mid: 0.0,
            spread: 0.0,
            volatility: 0.0,
            moving_average: None,
            ma_deviation: None,
            cash_before: 0.0,
            cash_after: 0.0,
            holdings_before: 0,
            holdings_after: 0,
            cumulative_pnl: 0.0,
        }
    }

    /// Reset every column not in `keep` to its default.
    ///
    /// Identification columns (tick, agent id, action) are never cleared.
    pub fn retain_fields(&mut self, keep: impl Fn(LedgerField) -> bool) {
        for field in LedgerField::ALL {
            if field.is_key() || keep(field) {
                continue;
            }
            match field {
                LedgerField::Tick | LedgerField::AgentId | LedgerField::Action => {}
                LedgerField::Strategy => self.strategy.clear(),
                LedgerField::Units => self.units = 0,
                LedgerField::Price => self.price = 0.0,
                LedgerField::Notional => self.notional = 0.0,
                LedgerField::BestBid => self.best_bid = 0.0,
                LedgerField::BestAsk => self.best_ask = 0.0,
                LedgerField::Mid => self.mid = 0.0,
                LedgerField::Spread => self.spread = 0.0,
                LedgerField::Volatility => self.volatility = 0.0,
                LedgerField::MovingAverage => self.moving_average = None,
                LedgerField::MaDeviation => self.ma_deviation = None,
                LedgerField::CashBefore => self.cash_before = 0.0,
                LedgerField::CashAfter => self.cash_after = 0.0,
                LedgerField::HoldingsBefore => self.holdings_before = 0,
                LedgerField::HoldingsAfter => self.holdings_after = 0,
                LedgerField::CumulativePnl => self.cumulative_pnl = 0.0,
            }
        }
    }
}

/// Ledger column names, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LedgerField {
    Tick,
    AgentId,
    Strategy,
    Action,
    Units,
    Price,
    Notional,
    BestBid,
    BestAsk,
    Mid,
    Spread,
    Volatility,
    MovingAverage,
    MaDeviation,
    CashBefore,
    CashAfter,
    HoldingsBefore,
    HoldingsAfter,
    CumulativePnl,
}

impl LedgerField {
    pub const ALL: [LedgerField; 19] = [
        LedgerField::Tick,
        LedgerField::AgentId,
        LedgerField::Strategy,
        LedgerField::Action,
        LedgerField::Units,
        LedgerField::Price,
        LedgerField::Notional,
        LedgerField::BestBid,
        LedgerField::BestAsk,
        LedgerField::Mid,
        LedgerField::Spread,
        LedgerField::Volatility,
        LedgerField::MovingAverage,
        LedgerField::MaDeviation,
        LedgerField::CashBefore,
        LedgerField::CashAfter,
        LedgerField::HoldingsBefore,
        LedgerField::HoldingsAfter,
        LedgerField::CumulativePnl,
    ];

    /// Columns every ingested ledger must carry.
    pub const REQUIRED: [LedgerField; 5] = [
        LedgerField::Tick,
        LedgerField::AgentId,
        LedgerField::Action,
        LedgerField::Units,
        LedgerField::Price,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LedgerField::Tick => "tick",
            LedgerField::AgentId => "agent_id",
            LedgerField::Strategy => "strategy",
            LedgerField::Action => "action",
            LedgerField::Units => "units",
            LedgerField::Price => "price",
            LedgerField::Notional => "notional",
            LedgerField::BestBid => "best_bid",
            LedgerField::BestAsk => "best_ask",
            LedgerField::Mid => "mid",
            LedgerField::Spread => "spread",
            LedgerField::Volatility => "volatility",
            LedgerField::MovingAverage => "moving_average",
            LedgerField::MaDeviation => "ma_deviation",
            LedgerField::CashBefore => "cash_before",
            LedgerField::CashAfter => "cash_after",
            LedgerField::HoldingsBefore => "holdings_before",
            LedgerField::HoldingsAfter => "holdings_after",
            LedgerField::CumulativePnl => "cumulative_pnl",
        }
    }

    /// Identification columns. They locate a trade and are never masked.
    pub fn is_key(self) -> bool {
        matches!(
            self,
            LedgerField::Tick | LedgerField::AgentId | LedgerField::Action
        )
    }
}

impl fmt::Display for LedgerField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LedgerField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        LedgerField::ALL
            .into_iter()
            .find(|f| f.as_str() == name)
            .ok_or_else(|| format!("unknown ledger field '{name}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_round_trip() {
        for field in LedgerField::ALL {
            assert_eq!(field.as_str().parse::<LedgerField>(), Ok(field));
        }
        assert!("ticks".parse::<LedgerField>().is_err());
    }

    #[test]
    fn action_parsing_is_case_insensitive() {
        assert_eq!("BUY".parse::<Action>(), Ok(Action::Buy));
        assert_eq!(" sell ".parse::<Action>(), Ok(Action::Sell));
        assert!("hold".parse::<Action>().is_err());
    }

    #[test]
    fn retain_fields_clears_everything_but_keys_and_kept() {
        let mut rec = TradeRecord::bare(3, AgentId(1), Action::Buy, 5, 100.0);
        rec.strategy = "momentum".into();
        rec.cash_before = 1000.0;
        rec.moving_average = Some(99.0);

        rec.retain_fields(|f| f == LedgerField::Units);

        assert_eq!(rec.tick, 3);
        assert_eq!(rec.agent_id, AgentId(1));
        assert_eq!(rec.action, Action::Buy);
        assert_eq!(rec.units, 5);
        assert_eq!(rec.price, 0.0);
        assert!(rec.strategy.is_empty());
        assert_eq!(rec.cash_before, 0.0);
        assert_eq!(rec.moving_average, None);
    }
}
