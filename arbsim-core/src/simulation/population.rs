//! Population builder.
//!
//! Regular agents cycle through the five observable archetypes; arbitrage
//! agents come next, then copycats. Ids are contiguous from 0.

use crate::config::SimConfig;
use crate::domain::{Agent, AgentId};
use crate::strategy::{StrategyKind, StrategyPolicy};
use rand::Rng;

/// Archetype for the agent at `index` in a population built from `config`.
pub fn kind_for_index(config: &SimConfig, index: usize) -> StrategyKind {
    if index < config.num_agents {
        StrategyKind::OBSERVABLE[index % StrategyKind::OBSERVABLE.len()]
    } else if index < config.num_agents + config.num_arbitrage_agents {
        StrategyKind::Arbitrage
    } else {
        StrategyKind::Copycat
    }
}

/// Build and calibrate every agent, drawing from `rng` in id order.
pub fn build_population<R: Rng + ?Sized>(config: &SimConfig, rng: &mut R) -> Vec<Agent> {
    (0..config.total_agents())
        .map(|index| {
            let policy = StrategyPolicy::calibrate(kind_for_index(config, index), rng);
            Agent::new(AgentId(index as u32), config.initial_cash, policy)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn round_robin_then_specials() {
        let config = SimConfig {
            num_agents: 7,
            num_arbitrage_agents: 2,
            num_copycat_agents: 1,
            ..SimConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let agents = build_population(&config, &mut rng);
        let kinds: Vec<StrategyKind> = agents.iter().map(|a| a.policy.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                StrategyKind::TrendFollowing,
                StrategyKind::MeanReversion,
                StrategyKind::Momentum,
                StrategyKind::Breakout,
                StrategyKind::ValueInvesting,
                StrategyKind::TrendFollowing,
                StrategyKind::MeanReversion,
                StrategyKind::Arbitrage,
                StrategyKind::Arbitrage,
                StrategyKind::Copycat,
            ]
        );
        assert!(agents.iter().enumerate().all(|(i, a)| a.id == AgentId(i as u32)));
        assert!(agents.iter().all(|a| a.cash == 1000.0 && a.holdings == 0));
    }

    #[test]
    fn calibration_is_seeded() {
        let config = SimConfig {
            num_agents: 5,
            ..SimConfig::default()
        };
        let a = build_population(&config, &mut StdRng::seed_from_u64(5));
        let b = build_population(&config, &mut StdRng::seed_from_u64(5));
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(format!("{:?}", x.policy), format!("{:?}", y.policy));
        }
    }
}
