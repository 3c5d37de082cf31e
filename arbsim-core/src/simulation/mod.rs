//! Tick loop.
//!
//! Per tick:
//! 1. Clock: advance the counter, maybe open a bias cycle, take the random step
//! 2. Shuffle the agent evaluation order
//! 3. Each agent decides on a snapshot and the execution engine fills it
//! 4. Clock: record the close, force the bias off at the cycle boundary
//! 5. Mark every agent to market and publish peer outcomes for the next tick
//!
//! One `StdRng` seeded from the configuration drives calibration, the price
//! walk, the shuffle and copycat draws, so a seed fully determines a run.

pub mod population;
pub mod result;

pub use population::{build_population, kind_for_index};
pub use result::{AgentWealth, SimulationResult, TickSummary};

use crate::config::{ConfigError, SimConfig};
use crate::domain::{Agent, AgentId};
use crate::execution::ExecutionEngine;
use crate::ledger::TradeLedger;
use crate::market::{MarketClock, MarketSnapshot, MarketState, PeerOutcome};
use crate::rng::run_rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

pub struct Simulation {
    ticks_to_run: u64,
    seed: u64,
    run_id: String,
    clock: MarketClock,
    market: MarketState,
    agents: Vec<Agent>,
    executor: ExecutionEngine,
    ledger: TradeLedger,
    rng: StdRng,
    order: Vec<usize>,
    peers: Vec<PeerOutcome>,
    marks: Vec<f64>,
    summaries: Vec<TickSummary>,
}

impl Simulation {
    /// Validate `config`, seed the generator and build the population.
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = run_rng(config.seed);
        let agents = build_population(config, &mut rng);
        Self::assemble(config, agents, rng)
    }

    /// Run with a hand-built population. Agent ids must be `0..agents.len()`.
    pub fn with_agents(config: &SimConfig, agents: Vec<Agent>) -> Result<Self, ConfigError> {
        config.validate()?;
        for (i, agent) in agents.iter().enumerate() {
            if agent.id != AgentId(i as u32) {
                return Err(ConfigError::Invalid(format!(
                    "agent at position {i} has id {}, expected {i}",
                    agent.id
                )));
            }
        }
        Self::assemble(config, agents, run_rng(config.seed))
    }

    fn assemble(config: &SimConfig, agents: Vec<Agent>, rng: StdRng) -> Result<Self, ConfigError> {
        let clock = MarketClock::new(&config.market)?;
        let market = MarketState::new(config.initial_price, config.price_impact);
        let marks = agents.iter().map(|a| a.wealth(market.price)).collect();
        Ok(Self {
            ticks_to_run: config.ticks,
            seed: config.seed,
            run_id: config.run_id(),
            clock,
            market,
            order: (0..agents.len()).collect(),
            agents,
            executor: ExecutionEngine::new(),
            ledger: TradeLedger::new(&config.ledger),
            rng,
            peers: Vec::new(),
            marks,
            summaries: Vec::new(),
        })
    }

    pub fn market(&self) -> &MarketState {
        &self.market
    }

    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn ledger(&self) -> &TradeLedger {
        &self.ledger
    }

    pub fn summaries(&self) -> &[TickSummary] {
        &self.summaries
    }

    /// Advance one tick.
    pub fn step(&mut self) -> &TickSummary {
        let onset = self.clock.begin_tick(&mut self.market, &mut self.rng);
        self.order.shuffle(&mut self.rng);

        let mut last_trades = vec![None; self.agents.len()];
        let mut trades = 0;
        let mut units_traded = 0;

        for k in 0..self.order.len() {
            let i = self.order[k];
            let agent = &mut self.agents[i];
            let view = agent.view();
            let intent = {
                let snapshot = MarketSnapshot::new(&self.market, &self.peers, onset);
                agent.policy.decide(&view, &snapshot, &mut self.rng)
            };
            if let Some(fill) = self.executor.execute(intent, agent, &mut self.market) {
                self.ledger.append(
                    self.market.tick,
                    agent.id,
                    agent.policy.kind().label(),
                    &fill,
                    self.market.price_impact,
                );
                last_trades[i] = Some((fill.action, fill.units));
                trades += 1;
                units_traded += fill.units;
            }
        }

        let bias = self.market.bias;
        self.clock.end_tick(&mut self.market);

        let price = self.market.price;
        self.peers.clear();
        for (i, agent) in self.agents.iter().enumerate() {
            let wealth = agent.wealth(price);
            self.peers.push(PeerOutcome {
                agent_id: agent.id,
                last_trade: last_trades[i],
                wealth_change: wealth - self.marks[i],
            });
            self.marks[i] = wealth;
        }

        log::trace!(
            "tick {}: price {:.4}, {} trades, {} units",
            self.market.tick,
            price,
            trades,
            units_traded
        );
        self.summaries.push(TickSummary {
            tick: self.market.tick,
            price,
            trades,
            units_traded,
            bias,
        });
        &self.summaries[self.summaries.len() - 1]
    }

    /// Run the configured number of ticks and hand back the results.
    pub fn run(mut self) -> SimulationResult {
        log::info!(
            "simulation {} starting: seed {}, {} agents, {} ticks",
            &self.run_id[..12.min(self.run_id.len())],
            self.seed,
            self.agents.len(),
            self.ticks_to_run
        );
        for _ in 0..self.ticks_to_run {
            self.step();
        }
        self.finish()
    }

    /// Consume the simulation without running further ticks.
    pub fn finish(self) -> SimulationResult {
        let final_price = self.market.price;
        let final_wealth = self
            .agents
            .iter()
            .map(|a| AgentWealth {
                agent_id: a.id,
                strategy: a.policy.kind(),
                cash: a.cash,
                holdings: a.holdings,
                wealth: a.wealth(final_price),
            })
            .collect();
        log::info!(
            "simulation finished at tick {}: {} trades, final price {:.4}",
            self.market.tick,
            self.ledger.len(),
            final_price
        );
        SimulationResult {
            seed: self.seed,
            run_id: self.run_id,
            ledger: self.ledger.into_records(),
            ticks: self.summaries,
            final_price,
            final_wealth,
        }
    }
}

/// Build and run a simulation from `config`.
pub fn simulate(config: &SimConfig) -> Result<SimulationResult, ConfigError> {
    Ok(Simulation::new(config)?.run())
}
