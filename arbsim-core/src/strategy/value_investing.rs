//! Value investing: treat the trailing mean as fair value.

use super::{signal_intent, TradeIntent};
use crate::domain::Action;
use crate::market::MarketSnapshot;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct ValueInvesting {
    pub window: usize,
    pub threshold: f64,
    pub sensitivity: f64,
}

impl ValueInvesting {
    pub fn new(window: usize, threshold: f64, sensitivity: f64) -> Self {
        Self {
            window: window.max(1),
            threshold,
            sensitivity,
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(
            rng.gen_range(10..=50),
            rng.gen_range(1.0..5.0),
            rng.gen_range(0.5..1.5),
        )
    }

    pub fn fair_value(&self, history: &[f64]) -> Option<f64> {
        if history.len() < 2 {
            return None;
        }
        let window = self.window.min(history.len() - 1);
        let recent = &history[history.len() - window..];
        Some(recent.iter().sum::<f64>() / recent.len() as f64)
    }

    pub fn decide(&self, market: &MarketSnapshot<'_>) -> TradeIntent {
        let Some(fair) = self.fair_value(market.price_history) else {
            return TradeIntent::Hold;
        };
        // Overvalued (positive deviation) means sell.
        signal_intent(market.price - fair, self.threshold, self.sensitivity, Action::Sell)
    }
}
