//! Breakout: trade when price clears the trailing range by a margin.

use super::TradeIntent;
use crate::domain::Action;
use crate::market::MarketSnapshot;
use rand::Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Breakout {
    pub window: usize,
    pub threshold: f64,
}

impl Breakout {
    pub fn new(window: usize, threshold: f64) -> Self {
        Self {
            window: window.max(1),
            threshold,
        }
    }

    pub fn calibrate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::new(rng.gen_range(5..=15), rng.gen_range(0.5..2.0))
    }

    pub fn decide(&self, market: &MarketSnapshot<'_>) -> TradeIntent {
        let history = market.price_history;
        if history.len() < 2 {
            return TradeIntent::Hold;
        }
        let window = self.window.min(history.len() - 1);
        let recent = &history[history.len() - window..];
        let high = recent.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let low = recent.iter().copied().fold(f64::INFINITY, f64::min);

        let upper = high + self.threshold;
        let lower = low - self.threshold;
        if market.price > upper {
            let units = (1.0 + (market.price - upper)).floor() as u64;
            TradeIntent::new(Action::Buy, units)
        } else if market.price < lower {
            let units = (1.0 + (lower - market.price)).floor() as u64;
            TradeIntent::new(Action::Sell, units)
        } else {
            TradeIntent::Hold
        }
    }
}
