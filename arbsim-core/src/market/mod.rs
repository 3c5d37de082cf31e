//! Market state and the bias-cycle clock that drives the price walk.

pub mod clock;
pub mod state;

pub use clock::MarketClock;
pub use state::{BiasState, MarketSnapshot, MarketState, PeerOutcome};
