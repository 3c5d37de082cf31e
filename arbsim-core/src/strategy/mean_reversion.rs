//! Mean reversion: fade the last price change.

use super::{signal_intent, TradeIntent};
use crate::domain::Action;
use crate::market::MarketSnapshot;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct MeanReversion {
    pub threshold: f64,
    pub sensitivity: f64,
}

impl MeanReversion {
    pub fn new(threshold: f64, sensitivity: f64) -> Self {
        Self {
            threshold,
            sensitivity,
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(0.1..1.0), rng.gen_range(0.5..1.5))
    }

    pub fn decide(&self, market: &MarketSnapshot<'_>) -> TradeIntent {
        let signal = market.price - market.last_price;
        signal_intent(signal, self.threshold, self.sensitivity, Action::Sell)
    }
}
