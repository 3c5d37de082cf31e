//! Domain types shared by the simulator and the detection engine.

pub mod agent;
pub mod ids;
pub mod trade;

pub use agent::{Agent, AgentView};
pub use ids::AgentId;
pub use trade::{Action, LedgerField, TradeRecord};
