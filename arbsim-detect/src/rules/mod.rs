//! Detection rules.
//!
//! Each rule is a stateful scorer folded over the tick-ordered ledger. Rules
//! declare the ledger columns they read (`fields`); the engine refuses to
//! build if any declared column is outside the allowed set.
//!
//! Scores are bounded to [0, 1]. Per-trade rules score every trade they
//! apply to; flagging rules (round trip, predictive) only emit flags.

pub mod aggressive;
pub mod cycle_alignment;
pub mod deviation;
pub mod inventory_turnover;
pub mod predictive;
pub mod price_impact;
pub mod round_trip;
pub mod spread_capture;
pub mod vwap;

pub use aggressive::{AggressiveBuyRule, AggressiveSellRule};
pub use cycle_alignment::CycleAlignmentRule;
pub use deviation::DeviationRule;
pub use inventory_turnover::InventoryTurnoverRule;
pub use predictive::PredictiveTradeRule;
pub use price_impact::PriceImpactRule;
pub use round_trip::RoundTripProfitRule;
pub use spread_capture::SpreadCaptureRule;
pub use vwap::VwapArbitrageRule;

use crate::index::LedgerIndex;
use arbsim_core::{AgentId, LedgerField, TradeRecord};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One rule output for an (agent, tick) cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleScore {
    pub rule: RuleKind,
    pub agent_id: AgentId,
    pub tick: u64,
    pub score: f64,
}

/// Clamp into [0, 1]; non-finite values become 0.
pub(crate) fn bounded(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    RoundTripProfit,
    PredictiveTrade,
    SpreadCapture,
    VwapArbitrage,
    PriceImpact,
    InventoryTurnover,
    AggressiveBuy,
    AggressiveSell,
    CycleAlignment,
    Deviation,
}

impl RuleKind {
    pub const ALL: [RuleKind; 10] = [
        RuleKind::RoundTripProfit,
        RuleKind::PredictiveTrade,
        RuleKind::SpreadCapture,
        RuleKind::VwapArbitrage,
        RuleKind::PriceImpact,
        RuleKind::InventoryTurnover,
        RuleKind::AggressiveBuy,
        RuleKind::AggressiveSell,
        RuleKind::CycleAlignment,
        RuleKind::Deviation,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RuleKind::RoundTripProfit => "round_trip_profit",
            RuleKind::PredictiveTrade => "predictive_trade",
            RuleKind::SpreadCapture => "spread_capture",
            RuleKind::VwapArbitrage => "vwap_arbitrage",
            RuleKind::PriceImpact => "price_impact",
            RuleKind::InventoryTurnover => "inventory_turnover",
            RuleKind::AggressiveBuy => "aggressive_buy",
            RuleKind::AggressiveSell => "aggressive_sell",
            RuleKind::CycleAlignment => "cycle_alignment",
            RuleKind::Deviation => "deviation",
        }
    }

    /// Ledger columns the rule reads.
    pub fn fields(self) -> &'static [LedgerField] {
        match self {
            RuleKind::RoundTripProfit => RoundTripProfitRule::FIELDS,
            RuleKind::PredictiveTrade => PredictiveTradeRule::FIELDS,
            RuleKind::SpreadCapture => SpreadCaptureRule::FIELDS,
            RuleKind::VwapArbitrage => VwapArbitrageRule::FIELDS,
            RuleKind::PriceImpact => PriceImpactRule::FIELDS,
            RuleKind::InventoryTurnover => InventoryTurnoverRule::FIELDS,
            RuleKind::AggressiveBuy => AggressiveBuyRule::FIELDS,
            RuleKind::AggressiveSell => AggressiveSellRule::FIELDS,
            RuleKind::CycleAlignment => CycleAlignmentRule::FIELDS,
            RuleKind::Deviation => DeviationRule::FIELDS,
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RuleKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        RuleKind::ALL
            .into_iter()
            .find(|k| k.label() == name)
            .ok_or_else(|| format!("unknown rule '{name}'"))
    }
}

/// Rule parameters shared across one detection run.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleParams {
    pub time_window: u64,
    pub profit_threshold: f64,
    pub predict_window: u64,
    pub predict_threshold: f64,
    pub cycle_length: u64,
    pub cycle_offsets: Vec<u64>,
}

impl Default for RuleParams {
    fn default() -> Self {
        Self {
            time_window: 10,
            profit_threshold: 0.01,
            predict_window: 5,
            predict_threshold: 0.02,
            cycle_length: 10,
            cycle_offsets: vec![1],
        }
    }
}

/// A rule instance with fresh state.
#[derive(Debug, Clone)]
pub enum Rule {
    RoundTripProfit(RoundTripProfitRule),
    PredictiveTrade(PredictiveTradeRule),
    SpreadCapture(SpreadCaptureRule),
    VwapArbitrage(VwapArbitrageRule),
    PriceImpact(PriceImpactRule),
    InventoryTurnover(InventoryTurnoverRule),
    AggressiveBuy(AggressiveBuyRule),
    AggressiveSell(AggressiveSellRule),
    CycleAlignment(CycleAlignmentRule),
    Deviation(DeviationRule),
}

impl Rule {
    pub fn new(kind: RuleKind, params: &RuleParams) -> Self {
        match kind {
            RuleKind::RoundTripProfit => Rule::RoundTripProfit(RoundTripProfitRule::new(
                params.profit_threshold,
                params.time_window,
            )),
            RuleKind::PredictiveTrade => Rule::PredictiveTrade(PredictiveTradeRule::new(
                params.predict_window,
                params.predict_threshold,
            )),
            RuleKind::SpreadCapture => Rule::SpreadCapture(SpreadCaptureRule),
            RuleKind::VwapArbitrage => Rule::VwapArbitrage(VwapArbitrageRule::default()),
            RuleKind::PriceImpact => Rule::PriceImpact(PriceImpactRule::default()),
            RuleKind::InventoryTurnover => Rule::InventoryTurnover(InventoryTurnoverRule),
            RuleKind::AggressiveBuy => Rule::AggressiveBuy(AggressiveBuyRule),
            RuleKind::AggressiveSell => Rule::AggressiveSell(AggressiveSellRule),
            RuleKind::CycleAlignment => Rule::CycleAlignment(CycleAlignmentRule::new(
                params.cycle_length,
                params.cycle_offsets.iter().copied(),
            )),
            RuleKind::Deviation => Rule::Deviation(DeviationRule),
        }
    }

    pub fn kind(&self) -> RuleKind {
        match self {
            Rule::RoundTripProfit(_) => RuleKind::RoundTripProfit,
            Rule::PredictiveTrade(_) => RuleKind::PredictiveTrade,
            Rule::SpreadCapture(_) => RuleKind::SpreadCapture,
            Rule::VwapArbitrage(_) => RuleKind::VwapArbitrage,
            Rule::PriceImpact(_) => RuleKind::PriceImpact,
            Rule::InventoryTurnover(_) => RuleKind::InventoryTurnover,
            Rule::AggressiveBuy(_) => RuleKind::AggressiveBuy,
            Rule::AggressiveSell(_) => RuleKind::AggressiveSell,
            Rule::CycleAlignment(_) => RuleKind::CycleAlignment,
            Rule::Deviation(_) => RuleKind::Deviation,
        }
    }

    /// Feed one trade. Trades must arrive in non-decreasing tick order.
    pub fn observe(&mut self, trade: &TradeRecord, index: &LedgerIndex, out: &mut Vec<RuleScore>) {
        let kind = self.kind();
        let mut emit = |tick: u64, score: f64| {
            out.push(RuleScore {
                rule: kind,
                agent_id: trade.agent_id,
                tick,
                score: bounded(score),
            })
        };
        match self {
            Rule::RoundTripProfit(r) => {
                if let Some(flags) = r.observe(trade) {
                    emit(flags.close_tick, 1.0);
                    emit(flags.entry_tick, 0.5);
                }
            }
            Rule::PredictiveTrade(r) => {
                if r.flags(trade, index) {
                    emit(trade.tick, 1.0);
                }
            }
            Rule::SpreadCapture(r) => emit(trade.tick, r.score(trade)),
            Rule::VwapArbitrage(r) => emit(trade.tick, r.observe(trade)),
            Rule::PriceImpact(r) => emit(trade.tick, r.observe(trade)),
            Rule::InventoryTurnover(r) => emit(trade.tick, r.score(trade)),
            Rule::AggressiveBuy(r) => {
                if let Some(score) = r.score(trade) {
                    emit(trade.tick, score);
                }
            }
            Rule::AggressiveSell(r) => {
                if let Some(score) = r.score(trade) {
                    emit(trade.tick, score);
                }
            }
            Rule::CycleAlignment(r) => emit(trade.tick, r.score(trade)),
            Rule::Deviation(r) => {
                if let Some(score) = r.score(trade) {
                    emit(trade.tick, score);
                }
            }
        }
    }
}
