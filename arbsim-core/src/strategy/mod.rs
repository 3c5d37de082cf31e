//! Strategy policies.
//!
//! A closed set of behavioral archetypes. Each variant owns its calibration,
//! drawn once at construction from the run's seeded generator, plus any
//! private memory it needs (arbitrage bias tracking, copycat peer scores).
//! Decisions are made from an [`AgentView`] and a [`MarketSnapshot`] only.

pub mod arbitrage;
pub mod breakout;
pub mod copycat;
pub mod mean_reversion;
pub mod momentum;
pub mod trend_following;
pub mod value_investing;

pub use arbitrage::Arbitrage;
pub use breakout::Breakout;
pub use copycat::Copycat;
pub use mean_reversion::MeanReversion;
pub use momentum::Momentum;
pub use trend_following::TrendFollowing;
pub use value_investing::ValueInvesting;

use crate::domain::{Action, AgentView};
use crate::market::MarketSnapshot;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a policy wants to do this tick. Units are always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeIntent {
    Hold,
    Buy(u64),
    Sell(u64),
}

impl TradeIntent {
    /// Build an intent, collapsing zero units to `Hold`.
    pub fn new(action: Action, units: u64) -> Self {
        match (action, units) {
            (_, 0) => TradeIntent::Hold,
            (Action::Buy, n) => TradeIntent::Buy(n),
            (Action::Sell, n) => TradeIntent::Sell(n),
        }
    }

    pub fn action(self) -> Option<Action> {
        match self {
            TradeIntent::Hold => None,
            TradeIntent::Buy(_) => Some(Action::Buy),
            TradeIntent::Sell(_) => Some(Action::Sell),
        }
    }

    pub fn units(self) -> u64 {
        match self {
            TradeIntent::Hold => 0,
            TradeIntent::Buy(n) | TradeIntent::Sell(n) => n,
        }
    }
}

/// Trade size for the threshold archetypes: one unit, plus `sensitivity`
/// units per unit of signal beyond the threshold.
pub fn threshold_units(magnitude: f64, threshold: f64, sensitivity: f64) -> u64 {
    let excess = (magnitude - threshold).max(0.0);
    (sensitivity * excess).floor() as u64 + 1
}

/// Trade on a signal that crossed `±threshold`: `up` when positive,
/// the opposite action when negative.
pub(crate) fn signal_intent(signal: f64, threshold: f64, sensitivity: f64, up: Action) -> TradeIntent {
    if !signal.is_finite() || signal.abs() < threshold || signal == 0.0 {
        return TradeIntent::Hold;
    }
    let units = threshold_units(signal.abs(), threshold, sensitivity);
    let down = match up {
        Action::Buy => Action::Sell,
        Action::Sell => Action::Buy,
    };
    TradeIntent::new(if signal > 0.0 { up } else { down }, units)
}

/// Archetype label, as written to the ledger's `strategy` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    TrendFollowing,
    MeanReversion,
    Momentum,
    Breakout,
    ValueInvesting,
    Arbitrage,
    Copycat,
}

impl StrategyKind {
    /// Archetypes that trade on observable prices only, in round-robin order.
    pub const OBSERVABLE: [StrategyKind; 5] = [
        StrategyKind::TrendFollowing,
        StrategyKind::MeanReversion,
        StrategyKind::Momentum,
        StrategyKind::Breakout,
        StrategyKind::ValueInvesting,
    ];

    pub fn label(self) -> &'static str {
        match self {
            StrategyKind::TrendFollowing => "trend_following",
            StrategyKind::MeanReversion => "mean_reversion",
            StrategyKind::Momentum => "momentum",
            StrategyKind::Breakout => "breakout",
            StrategyKind::ValueInvesting => "value_investing",
            StrategyKind::Arbitrage => "arbitrage",
            StrategyKind::Copycat => "copycat",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One calibrated policy instance.
#[derive(Debug, Clone)]
pub enum StrategyPolicy {
    TrendFollowing(TrendFollowing),
    MeanReversion(MeanReversion),
    Momentum(Momentum),
    Breakout(Breakout),
    ValueInvesting(ValueInvesting),
    Arbitrage(Arbitrage),
    Copycat(Copycat),
}

impl StrategyPolicy {
    /// Draw calibration parameters for `kind`.
    pub fn calibrate<R: Rng + ?Sized>(kind: StrategyKind, rng: &mut R) -> Self {
        match kind {
            StrategyKind::TrendFollowing => Self::TrendFollowing(TrendFollowing::calibrate(rng)),
            StrategyKind::MeanReversion => Self::MeanReversion(MeanReversion::calibrate(rng)),
            StrategyKind::Momentum => Self::Momentum(Momentum::calibrate(rng)),
            StrategyKind::Breakout => Self::Breakout(Breakout::calibrate(rng)),
            StrategyKind::ValueInvesting => Self::ValueInvesting(ValueInvesting::calibrate(rng)),
            StrategyKind::Arbitrage => Self::Arbitrage(Arbitrage::calibrate(rng)),
            StrategyKind::Copycat => Self::Copycat(Copycat::calibrate(rng)),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            Self::TrendFollowing(_) => StrategyKind::TrendFollowing,
            Self::MeanReversion(_) => StrategyKind::MeanReversion,
            Self::Momentum(_) => StrategyKind::Momentum,
            Self::Breakout(_) => StrategyKind::Breakout,
            Self::ValueInvesting(_) => StrategyKind::ValueInvesting,
            Self::Arbitrage(_) => StrategyKind::Arbitrage,
            Self::Copycat(_) => StrategyKind::Copycat,
        }
    }

    /// Decide this tick's intent. `rng` is only drawn from by the copycat.
    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        agent: &AgentView,
        market: &MarketSnapshot<'_>,
        rng: &mut R,
    ) -> TradeIntent {
        match self {
            Self::TrendFollowing(p) => p.decide(market),
            Self::MeanReversion(p) => p.decide(market),
            Self::Momentum(p) => p.decide(market),
            Self::Breakout(p) => p.decide(market),
            Self::ValueInvesting(p) => p.decide(market),
            Self::Arbitrage(p) => p.decide(agent, market),
            Self::Copycat(p) => p.decide(agent, market, rng),
        }
    }
}
