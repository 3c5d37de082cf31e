//! Bias-cycle clock.
//!
//! Each cycle of `cycle_length` ticks opens with a randomly directed drift
//! (BiasUp or BiasDown) on top of the Gaussian walk. The drift ends early
//! once price leaves the `±bias_band` corridor around the cycle's baseline,
//! and unconditionally at the cycle boundary.
//!
//! A tick has two halves around agent trading:
//! - `begin_tick`: advance the counter, maybe open a cycle, take the random step
//! - `end_tick`: record the closing price, force the bias off at the boundary

use crate::config::{ConfigError, MarketConfig};
use crate::market::state::{BiasState, MarketState};
use rand::Rng;
use rand_distr::{Distribution, Normal};

#[derive(Debug, Clone)]
pub struct MarketClock {
    cycle_length: u64,
    bias_drift: f64,
    bias_band: f64,
    noise: Normal<f64>,
}

impl MarketClock {
    pub fn new(config: &MarketConfig) -> Result<Self, ConfigError> {
        if config.cycle_length == 0 {
            return Err(ConfigError::Invalid(
                "market.cycle_length must be at least 1".into(),
            ));
        }
        let noise = Normal::new(0.0, config.noise_std)
            .map_err(|e| ConfigError::Invalid(format!("market.noise_std: {e}")))?;
        Ok(Self {
            cycle_length: config.cycle_length,
            bias_drift: config.bias_drift,
            bias_band: config.bias_band,
            noise,
        })
    }

    /// True on the first tick of a bias cycle (ticks 1, 11, 21, ... by default).
    pub fn is_cycle_onset(&self, tick: u64) -> bool {
        tick >= 1 && (tick - 1) % self.cycle_length == 0
    }

    pub fn is_cycle_end(&self, tick: u64) -> bool {
        tick % self.cycle_length == 0
    }

    /// Advance to the next tick and take the random price step.
    ///
    /// Returns true if a new bias cycle opened on this tick.
    pub fn begin_tick<R: Rng + ?Sized>(&self, state: &mut MarketState, rng: &mut R) -> bool {
        state.tick += 1;

        let onset = self.is_cycle_onset(state.tick);
        if onset {
            state.baseline_price = state.price;
            let direction = if rng.gen_bool(0.5) { 1 } else { -1 };
            state.bias = BiasState::from_direction(direction);
            log::debug!(
                "tick {}: bias cycle opened {:?} at baseline {:.4}",
                state.tick,
                state.bias,
                state.baseline_price
            );
        }

        state.last_price = state.price;
        let mut step = self.noise.sample(rng);
        if state.bias.is_active() {
            step += self.bias_drift * f64::from(state.bias.direction());
        }
        state.price = (state.price + step).max(0.0);

        if state.bias.is_active() {
            let upper = state.baseline_price * (1.0 + self.bias_band);
            let lower = state.baseline_price * (1.0 - self.bias_band);
            if state.price >= upper || state.price <= lower {
                log::debug!(
                    "tick {}: bias left the band at {:.4} (baseline {:.4})",
                    state.tick,
                    state.price,
                    state.baseline_price
                );
                state.bias = BiasState::NoBias;
            }
        }

        onset
    }

    /// Close the tick: append the closing price and force the bias off at
    /// the cycle boundary.
    pub fn end_tick(&self, state: &mut MarketState) {
        state.price_history.push(state.price);
        if self.is_cycle_end(state.tick) && state.bias.is_active() {
            log::debug!("tick {}: bias cycle closed at boundary", state.tick);
            state.bias = BiasState::NoBias;
        }
    }
}
