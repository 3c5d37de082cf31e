//! ArbSim Core: agent-based single-asset market simulation.
//!
//! This crate contains the simulation half of the system:
//! - Domain types (agents, trade records, the ledger column schema)
//! - Bias-cycle market clock driving a Gaussian price walk
//! - Closed set of strategy policies, one per behavioral archetype
//! - Unit-by-unit execution with per-unit price impact
//! - Append-only trade ledger with volatility, moving-average and P&L enrichment
//! - Seeded tick loop tying it all together

pub mod config;
pub mod domain;
pub mod execution;
pub mod ledger;
pub mod market;
pub mod rng;
pub mod simulation;
pub mod strategy;

pub use config::{ConfigError, LedgerConfig, MarketConfig, SimConfig};
pub use domain::{Action, Agent, AgentId, LedgerField, TradeRecord};
pub use simulation::{simulate, Simulation, SimulationResult, TickSummary};
