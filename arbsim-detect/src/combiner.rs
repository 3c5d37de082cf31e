//! Score combiners: fold per-rule scores into one probability per
//! (agent, tick).
//!
//! Every combiner produces a gapless [`SuspicionTable`] over the ledger's tick
//! range. Cells nobody scored stay at 0.0 unless the combiner carries memory.

use crate::config::{CombinerKind, DetectionConfig};
use crate::index::LedgerIndex;
use crate::rules::{RuleKind, RuleScore};
use crate::table::SuspicionTable;
use arbsim_core::AgentId;
use std::collections::{BTreeMap, HashMap};

/// Trait for score combiners.
pub trait Combiner: Send + Sync {
    /// Configuration name (e.g., "weighted_logistic").
    fn name(&self) -> &str;

    /// Combine rule outputs for the ledger described by `index`.
    fn combine(&self, scores: &[RuleScore], index: &LedgerIndex) -> SuspicionTable;
}

/// Per-rule weights, defaulting to 1.0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleWeights(HashMap<RuleKind, f64>);

impl RuleWeights {
    pub fn new(weights: impl IntoIterator<Item = (RuleKind, f64)>) -> Self {
        Self(weights.into_iter().collect())
    }

    pub fn get(&self, kind: RuleKind) -> f64 {
        self.0.get(&kind).copied().unwrap_or(1.0)
    }
}

fn group_by_cell(scores: &[RuleScore]) -> BTreeMap<(AgentId, u64), Vec<&RuleScore>> {
    let mut cells: BTreeMap<(AgentId, u64), Vec<&RuleScore>> = BTreeMap::new();
    for s in scores {
        cells.entry((s.agent_id, s.tick)).or_default().push(s);
    }
    cells
}

fn logistic(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// `1 - prod(1 - p)` over every rule output in a cell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProbabilisticOr;

impl ProbabilisticOr {
    pub fn combine_probabilities(probs: impl IntoIterator<Item = f64>) -> f64 {
        let miss: f64 = probs
            .into_iter()
            .map(|p| 1.0 - p.clamp(0.0, 1.0))
            .product();
        (1.0 - miss).clamp(0.0, 1.0)
    }
}

impl Combiner for ProbabilisticOr {
    fn name(&self) -> &str {
        "probabilistic_or"
    }

    fn combine(&self, scores: &[RuleScore], index: &LedgerIndex) -> SuspicionTable {
        let mut table = SuspicionTable::zeroed(index);
        for ((agent, tick), cell) in group_by_cell(scores) {
            table.set(agent, tick, Self::combine_probabilities(cell.iter().map(|s| s.score)));
        }
        table
    }
}

/// Logistic of the weighted score sum, exponentially smoothed per agent.
///
/// Ticks where the agent neither traded nor was scored contribute a
/// probability of 0, so suspicion decays through quiet stretches.
#[derive(Debug, Clone)]
pub struct WeightedLogistic {
    pub weights: RuleWeights,
    pub alpha: f64,
}

impl WeightedLogistic {
    pub fn new(weights: RuleWeights, alpha: f64) -> Self {
        Self {
            weights,
            alpha: alpha.clamp(0.0, 1.0),
        }
    }
}

impl Combiner for WeightedLogistic {
    fn name(&self) -> &str {
        "weighted_logistic"
    }

    fn combine(&self, scores: &[RuleScore], index: &LedgerIndex) -> SuspicionTable {
        let mut table = SuspicionTable::zeroed(index);
        let cells = group_by_cell(scores);
        let ticks: Vec<u64> = table.ticks().collect();

        for &agent in index.agents() {
            let mut smoothed = 0.0;
            for &tick in &ticks {
                let cell = cells.get(&(agent, tick));
                let active = cell.is_some() || index.trade_count(agent, tick) > 0;
                let p = if active {
                    let linear: f64 = cell
                        .into_iter()
                        .flatten()
                        .map(|s| self.weights.get(s.rule) * s.score)
                        .sum();
                    logistic(linear)
                } else {
                    0.0
                };
                smoothed = self.alpha * p + (1.0 - self.alpha) * smoothed;
                table.set(agent, tick, smoothed);
            }
        }
        table
    }
}

/// Weighted score sum averaged over the agent's trades in the tick, capped
/// at 1.0. No memory across ticks.
#[derive(Debug, Clone, Default)]
pub struct WeightedAverage {
    pub weights: RuleWeights,
}

impl WeightedAverage {
    pub fn new(weights: RuleWeights) -> Self {
        Self { weights }
    }
}

impl Combiner for WeightedAverage {
    fn name(&self) -> &str {
        "weighted_average"
    }

    fn combine(&self, scores: &[RuleScore], index: &LedgerIndex) -> SuspicionTable {
        let mut table = SuspicionTable::zeroed(index);
        for ((agent, tick), cell) in group_by_cell(scores) {
            let total: f64 = cell.iter().map(|s| self.weights.get(s.rule) * s.score).sum();
            let trades = index.trade_count(agent, tick).max(1) as f64;
            table.set(agent, tick, (total / trades).clamp(0.0, 1.0));
        }
        table
    }
}

/// Build the combiner named by `config`.
pub fn create_combiner(config: &DetectionConfig) -> Box<dyn Combiner> {
    let weights = RuleWeights::new(RuleKind::ALL.into_iter().map(|k| (k, config.weight(k))));
    match config.combiner {
        CombinerKind::ProbabilisticOr => Box::new(ProbabilisticOr),
        CombinerKind::WeightedLogistic => Box::new(WeightedLogistic::new(weights, config.alpha)),
        CombinerKind::WeightedAverage => Box::new(WeightedAverage::new(weights)),
    }
}
