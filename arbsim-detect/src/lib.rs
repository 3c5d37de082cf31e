//! ArbSim Detect: batch arbitrage detection over a finished trade ledger.
//!
//! - Allowed-field gate: rules declare the columns they read and the engine
//!   refuses to build if any fall outside the configured set
//! - Ten heuristic rules, each a small state machine folded in tick order
//! - Pluggable combiners producing one probability per (agent, tick)
//! - Lenient ledger CSV ingestion and fixed-precision output

pub mod combiner;
pub mod config;
pub mod engine;
pub mod fields;
pub mod index;
pub mod io;
pub mod rules;
pub mod table;

pub use combiner::{
    create_combiner, Combiner, ProbabilisticOr, RuleWeights, WeightedAverage, WeightedLogistic,
};
pub use config::{CombinerKind, ConfigError, DetectionConfig};
pub use engine::{DetectionEngine, EngineError};
pub use fields::FieldSet;
pub use index::{IndexError, LedgerIndex};
pub use io::{
    read_ledger, read_ledger_file, write_ledger, write_ledger_file, write_suspicion,
    write_suspicion_file, LedgerIoError,
};
pub use rules::{RuleKind, RuleParams, RuleScore};
pub use table::SuspicionTable;
