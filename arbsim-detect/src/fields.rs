//! Allowed-field set: the ledger columns detectors may read.

use arbsim_core::LedgerField;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSet(BTreeSet<LedgerField>);

impl FieldSet {
    pub fn new(fields: impl IntoIterator<Item = LedgerField>) -> Self {
        Self(fields.into_iter().collect())
    }

    /// Every column except the strategy label, which is private to the simulator.
    pub fn observable() -> Self {
        Self::new(
            LedgerField::ALL
                .into_iter()
                .filter(|&f| f != LedgerField::Strategy),
        )
    }

    /// Parse column names, returning the first unknown name on failure.
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names
            .iter()
            .map(|n| n.as_ref().parse::<LedgerField>())
            .collect::<Result<BTreeSet<_>, _>>()
            .map(Self)
    }

    pub fn contains(&self, field: LedgerField) -> bool {
        self.0.contains(&field)
    }

    /// Fields from `required` that are not in this set, in declaration order.
    pub fn missing(&self, required: &[LedgerField]) -> Vec<LedgerField> {
        required
            .iter()
            .copied()
            .filter(|f| !self.0.contains(f))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = LedgerField> + '_ {
        self.0.iter().copied()
    }
}
