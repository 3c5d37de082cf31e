//! Detection configuration.
//!
//! ```toml
//! allowed_fields = ["tick", "agent_id", "action", "units", "price", "cash_before"]
//! rules = ["round_trip_profit", "aggressive_buy"]
//! combiner = "weighted_logistic"
//! alpha = 0.3
//!
//! [weights]
//! round_trip_profit = 2.0
//! ```

use crate::fields::FieldSet;
use crate::rules::{RuleKind, RuleParams};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0}")]
    UnknownField(String),

    #[error("{0}")]
    UnknownRule(String),

    #[error("invalid detection config: {0}")]
    Invalid(String),

    #[error("failed to parse detection TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to read detection config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinerKind {
    ProbabilisticOr,
    #[default]
    WeightedLogistic,
    WeightedAverage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Ledger columns detectors may read.
    pub allowed_fields: Vec<String>,
    /// Rules to run, in output order.
    pub rules: Vec<String>,
    pub time_window: u64,
    pub profit_threshold: f64,
    pub predict_window: u64,
    pub predict_threshold: f64,
    pub cycle_length: u64,
    pub cycle_offsets: Vec<u64>,
    /// Per-rule weights by rule name. Missing rules weigh 1.0.
    pub weights: BTreeMap<String, f64>,
    /// Smoothing factor for the weighted-logistic combiner.
    pub alpha: f64,
    pub combiner: CombinerKind,
    pub output_decimals: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        let params = RuleParams::default();
        Self {
            allowed_fields: FieldSet::observable()
                .iter()
                .map(|f| f.as_str().to_string())
                .collect(),
            rules: RuleKind::ALL.iter().map(|k| k.label().to_string()).collect(),
            time_window: params.time_window,
            profit_threshold: params.profit_threshold,
            predict_window: params.predict_window,
            predict_threshold: params.predict_threshold,
            cycle_length: params.cycle_length,
            cycle_offsets: params.cycle_offsets,
            weights: BTreeMap::new(),
            alpha: 0.5,
            combiner: CombinerKind::default(),
            output_decimals: 3,
        }
    }
}

impl DetectionConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: DetectionConfig = toml::from_str(content)?;
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
        self.field_set()?;
        self.rule_kinds()?;
        for name in self.weights.keys() {
            name.parse::<RuleKind>().map_err(ConfigError::UnknownRule)?;
        }
        if let Some((name, w)) = self.weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(ConfigError::Invalid(format!("weight for {name} is {w}")));
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(ConfigError::Invalid(format!(
                "alpha must be in [0, 1], got {}",
                self.alpha
            )));
        }
        if self.time_window == 0 || self.predict_window == 0 {
            return Err(ConfigError::Invalid("windows must be at least 1 tick".into()));
        }
        if self.cycle_length == 0 {
            return Err(ConfigError::Invalid("cycle_length must be >= 1".into()));
        }
        if self.profit_threshold < 0.0 || self.predict_threshold < 0.0 {
            return Err(ConfigError::Invalid("thresholds must be non-negative".into()));
        }
        Ok(())
    }

    pub fn field_set(&self) -> Result<FieldSet, ConfigError> {
        FieldSet::from_names(&self.allowed_fields).map_err(ConfigError::UnknownField)
    }

    pub fn rule_kinds(&self) -> Result<Vec<RuleKind>, ConfigError> {
        self.rules
            .iter()
            .map(|r| r.parse::<RuleKind>().map_err(ConfigError::UnknownRule))
            .collect()
    }

    pub fn rule_params(&self) -> RuleParams {
        RuleParams {
            time_window: self.time_window,
            profit_threshold: self.profit_threshold,
            predict_window: self.predict_window,
            predict_threshold: self.predict_threshold,
            cycle_length: self.cycle_length,
            cycle_offsets: self.cycle_offsets.clone(),
        }
    }

    pub fn weight(&self, kind: RuleKind) -> f64 {
        self.weights.get(kind.label()).copied().unwrap_or(1.0)
    }
}
