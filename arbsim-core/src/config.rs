//! Simulation configuration.
//!
//! Every field has a default, so a TOML file only needs to name what it
//! overrides:
//!
//! ```toml
//! seed = 7
//! ticks = 500
//! price_impact = 0.05
//!
//! [market]
//! bias_drift = 0.75
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from loading or validating a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

/// Full simulation configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub seed: u64,
    pub ticks: u64,
    pub initial_price: f64,
    pub price_impact: f64,
    pub initial_cash: f64,
    /// Agents with the five observable-signal archetypes, assigned round-robin.
    pub num_agents: usize,
    pub num_arbitrage_agents: usize,
    pub num_copycat_agents: usize,
    pub market: MarketConfig,
    pub ledger: LedgerConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            ticks: 1000,
            initial_price: 100.0,
            price_impact: 0.01,
            initial_cash: 1000.0,
            num_agents: 100,
            num_arbitrage_agents: 1,
            num_copycat_agents: 0,
            market: MarketConfig::default(),
            ledger: LedgerConfig::default(),
        }
    }
}

/// Price-walk and bias-cycle parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    pub cycle_length: u64,
    /// Extra per-tick drift while a bias is active.
    pub bias_drift: f64,
    /// Fractional distance from the cycle baseline that ends the bias early.
    pub bias_band: f64,
    pub noise_std: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            cycle_length: 10,
            bias_drift: 0.5,
            bias_band: 0.10,
            noise_std: 1.0,
        }
    }
}

/// Ledger enrichment windows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub volatility_window: usize,
    pub ma_window: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            volatility_window: 10,
            ma_window: 50,
        }
    }
}

impl SimConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite_non_negative = [
            ("initial_price", self.initial_price),
            ("price_impact", self.price_impact),
            ("initial_cash", self.initial_cash),
            ("market.bias_drift", self.market.bias_drift),
            ("market.bias_band", self.market.bias_band),
            ("market.noise_std", self.market.noise_std),
        ];
        for (name, value) in finite_non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if self.market.cycle_length == 0 {
            return Err(ConfigError::Invalid(
                "market.cycle_length must be at least 1".into(),
            ));
        }
        if self.ledger.volatility_window == 0 || self.ledger.ma_window == 0 {
            return Err(ConfigError::Invalid(
                "ledger windows must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn total_agents(&self) -> usize {
        self.num_agents + self.num_arbitrage_agents + self.num_copycat_agents
    }

    /// Deterministic content hash of this configuration (seed included).
    pub fn run_id(&self) -> String {
        // Plain data with no maps keyed by non-strings: serialization cannot fail.
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
