use crate::domain::Action;

/// Outcome of one fill sequence. Only produced when at least one unit filled.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill {
    pub action: Action,
    pub units: u64,
    /// Market price before the first unit.
    pub start_price: f64,
    /// Market price after the last unit, impact included.
    pub end_price: f64,
    pub cash_before: f64,
    pub cash_after: f64,
    pub holdings_before: u64,
    pub holdings_after: u64,
}

impl Fill {
    /// Total cash that changed hands (positive for both directions).
    pub fn cash_moved(&self) -> f64 {
        (self.cash_after - self.cash_before).abs()
    }

    /// Average price actually paid or received per unit.
    pub fn average_price(&self) -> f64 {
        self.cash_moved() / self.units as f64
    }
}
