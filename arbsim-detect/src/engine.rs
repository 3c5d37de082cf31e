//! Detection engine: validates rules against the allowed columns, runs them
//! over a finished ledger and hands their scores to a combiner.

use crate::combiner::{create_combiner, Combiner};
use crate::config::{ConfigError, DetectionConfig};
use crate::fields::FieldSet;
use crate::index::{IndexError, LedgerIndex};
use crate::rules::{Rule, RuleKind, RuleParams, RuleScore};
use crate::table::SuspicionTable;
use arbsim_core::{LedgerField, TradeRecord};
use rayon::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("rule {rule} reads fields outside the allowed set: {}", join_fields(.fields))]
    FieldsNotAllowed {
        rule: RuleKind,
        fields: Vec<LedgerField>,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Index(#[from] IndexError),
}

fn join_fields(fields: &[LedgerField]) -> String {
    fields
        .iter()
        .map(|f| f.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

pub struct DetectionEngine {
    rules: Vec<RuleKind>,
    params: RuleParams,
    allowed: FieldSet,
    combiner: Box<dyn Combiner>,
}

impl std::fmt::Debug for DetectionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DetectionEngine")
            .field("rules", &self.rules)
            .field("params", &self.params)
            .field("allowed", &self.allowed)
            .field("combiner", &self.combiner.name())
            .finish()
    }
}

impl DetectionEngine {
    /// Fails on the first rule that reads a column outside `allowed`.
    pub fn new(
        rules: Vec<RuleKind>,
        params: RuleParams,
        allowed: FieldSet,
        combiner: Box<dyn Combiner>,
    ) -> Result<Self, EngineError> {
        for &rule in &rules {
            let fields = allowed.missing(rule.fields());
            if !fields.is_empty() {
                return Err(EngineError::FieldsNotAllowed { rule, fields });
            }
        }
        log::info!(
            "detection engine: {} rules, {} allowed fields, combiner {}",
            rules.len(),
            allowed.iter().count(),
            combiner.name()
        );
        Ok(Self {
            rules,
            params,
            allowed,
            combiner,
        })
    }

    pub fn from_config(config: &DetectionConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Self::new(
            config.rule_kinds()?,
            config.rule_params(),
            config.field_set()?,
            create_combiner(config),
        )
    }

    pub fn rules(&self) -> &[RuleKind] {
        &self.rules
    }

    pub fn combiner(&self) -> &dyn Combiner {
        self.combiner.as_ref()
    }

    /// Tick-ordered copy of the ledger with disallowed columns cleared.
    /// Trades sharing a tick keep their ledger order.
    fn prepare(&self, trades: &[TradeRecord]) -> Vec<TradeRecord> {
        let mut prepared: Vec<TradeRecord> = trades.to_vec();
        prepared.sort_by_key(|t| t.tick);
        for trade in &mut prepared {
            trade.retain_fields(|f| self.allowed.contains(f));
        }
        prepared
    }

    fn run_rules(&self, trades: &[TradeRecord], index: &LedgerIndex) -> Vec<RuleScore> {
        let per_rule: Vec<Vec<RuleScore>> = self
            .rules
            .par_iter()
            .map(|&kind| {
                let mut rule = Rule::new(kind, &self.params);
                let mut out = Vec::new();
                for trade in trades {
                    rule.observe(trade, index, &mut out);
                }
                out
            })
            .collect();
        per_rule.into_iter().flatten().collect()
    }

    /// Raw rule outputs, grouped by rule in configured order.
    pub fn score(&self, trades: &[TradeRecord]) -> Result<Vec<RuleScore>, EngineError> {
        let prepared = self.prepare(trades);
        let index = LedgerIndex::build(&prepared)?;
        Ok(self.run_rules(&prepared, &index))
    }

    /// Combined suspicion table for `trades`. Fails before any rule runs when
    /// the ledger's tick range is too wide to tabulate.
    pub fn detect(&self, trades: &[TradeRecord]) -> Result<SuspicionTable, EngineError> {
        let prepared = self.prepare(trades);
        let index = LedgerIndex::build(&prepared)?;
        let scores = self.run_rules(&prepared, &index);
        log::debug!(
            "{} rule outputs over {} trades, {} agents",
            scores.len(),
            prepared.len(),
            index.agents().len()
        );
        Ok(self.combiner.combine(&scores, &index))
    }
}
