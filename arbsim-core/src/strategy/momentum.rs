//! Momentum: trade in the direction of the move over a lookback.
//!
//! The reference price is the close `lookback` ticks ago. Holds until the
//! history reaches that far back.

use super::{signal_intent, TradeIntent};
use crate::domain::Action;
use crate::market::MarketSnapshot;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Momentum {
    pub lookback: usize,
    pub threshold: f64,
    pub sensitivity: f64,
}

impl Momentum {
    pub fn new(lookback: usize, threshold: f64, sensitivity: f64) -> Self {
        Self {
            lookback: lookback.max(1),
            threshold,
            sensitivity,
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(3..=10),
            rng.gen_range(0.5..2.0),
            rng.gen_range(0.5..1.5),
        )
    }

    pub fn decide(&self, market: &MarketSnapshot<'_>) -> TradeIntent {
        let history = market.price_history;
        // history[i] is the close of tick i; tick `t - lookback` sits at len - lookback.
        if history.len() < self.lookback {
            return TradeIntent::Hold;
        }
        let reference = history[history.len() - self.lookback];
        let signal = market.price - reference;
        signal_intent(signal, self.threshold, self.sensitivity, Action::Buy)
    }
}
