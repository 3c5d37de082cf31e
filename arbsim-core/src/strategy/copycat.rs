//! Copycat: imitate whichever peer has been doing best lately.
//!
//! Each tick the policy folds last tick's peer outcomes into a decaying
//! score per peer (`score = decay * score + wealth_change`). If the best
//! scorer clears `confidence` and traded last tick, the copycat repeats that
//! trade with probability `imitation_prob`, at a jittered size.

use super::TradeIntent;
use crate::domain::{AgentId, AgentView};
use crate::market::MarketSnapshot;
use rand::Rng;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
pub struct Copycat {
    pub decay: f64,
    pub confidence: f64,
    pub imitation_prob: f64,
    scores: HashMap<AgentId, f64>,
}

impl Copycat {
    pub fn new(decay: f64, confidence: f64, imitation_prob: f64) -> Self {
        Self {
            decay,
            confidence,
            imitation_prob: imitation_prob.clamp(0.0, 1.0),
            scores: HashMap::new(),
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(0.80..0.95),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..0.9),
        )
    }

    pub fn score(&self, peer: AgentId) -> f64 {
        self.scores.get(&peer).copied().unwrap_or(0.0)
    }

    pub fn decide<R: Rng + ?Sized>(
        &mut self,
        agent: &AgentView,
        market: &MarketSnapshot<'_>,
        rng: &mut R,
    ) -> TradeIntent {
        for outcome in market.peers {
            if outcome.agent_id == agent.id {
                continue;
            }
            let score = self.scores.entry(outcome.agent_id).or_insert(0.0);
            *score = self.decay * *score + outcome.wealth_change;
        }

        let mut leader = None;
        let mut best = self.confidence;
        for outcome in market.peers {
            if outcome.agent_id == agent.id || outcome.last_trade.is_none() {
                continue;
            }
            let score = self.score(outcome.agent_id);
            if score > best {
                best = score;
                leader = outcome.last_trade;
            }
        }

        let Some((action, units)) = leader else {
            return TradeIntent::Hold;
        };
        if !rng.gen_bool(self.imitation_prob) {
            return TradeIntent::Hold;
        }
        let jitter: f64 = rng.gen_range(0.5..1.5);
        let sized = ((units as f64 * jitter).round() as u64).max(1);
        TradeIntent::new(action, sized)
    }
}
