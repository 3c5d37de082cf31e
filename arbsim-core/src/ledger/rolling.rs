//! Trailing window of deduplicated `(tick, price)` observations.

use std::collections::VecDeque;

#[derive(Debug, Clone)]
pub struct RollingWindow {
    capacity: usize,
    observations: VecDeque<(u64, f64)>,
}

impl RollingWindow {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            observations: VecDeque::with_capacity(capacity),
        }
    }

    /// Push an observation unless it repeats the most recent one exactly.
    ///
    /// Returns whether the observation was stored.
    pub fn push(&mut self, tick: u64, price: f64) -> bool {
        if self.observations.back() == Some(&(tick, price)) {
            return false;
        }
        if self.observations.len() == self.capacity {
            self.observations.pop_front();
        }
        self.observations.push_back((tick, price));
        true
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    fn last_prices(&self, n: usize) -> impl Iterator<Item = f64> + '_ {
        let skip = self.observations.len().saturating_sub(n);
        self.observations.iter().skip(skip).map(|&(_, p)| p)
    }

    /// Population standard deviation over the last `n` observations (or all,
    /// if fewer). Zero with fewer than two observations.
    pub fn population_std(&self, n: usize) -> f64 {
        let count = self.observations.len().min(n);
        if count < 2 {
            return 0.0;
        }
        let mean = self.last_prices(n).sum::<f64>() / count as f64;
        let var = self
            .last_prices(n)
            .map(|p| (p - mean) * (p - mean))
            .sum::<f64>()
            / count as f64;
        var.sqrt()
    }

    /// Mean of the last `n` observations, `None` until `n` exist.
    pub fn full_mean(&self, n: usize) -> Option<f64> {
        if n == 0 || self.observations.len() < n {
            return None;
        }
        Some(self.last_prices(n).sum::<f64>() / n as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_approx(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() < eps,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn consecutive_duplicates_skipped() {
        let mut w = RollingWindow::new(10);
        assert!(w.push(1, 100.0));
        assert!(!w.push(1, 100.0));
        assert!(w.push(1, 101.0));
        assert!(w.push(2, 101.0));
        assert_eq!(w.len(), 3);
    }

    #[test]
    fn capacity_evicts_oldest() {
        let mut w = RollingWindow::new(2);
        w.push(1, 1.0);
        w.push(2, 2.0);
        w.push(3, 3.0);
        assert_eq!(w.len(), 2);
        assert_eq!(w.full_mean(2), Some(2.5));
    }

    #[test]
    fn population_std_known_values() {
        let mut w = RollingWindow::new(10);
        for (t, p) in [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0].into_iter().enumerate() {
            w.push(t as u64, p);
        }
        assert_approx(w.population_std(10), 2.0, 1e-12);
        // last two: 7, 9
        assert_approx(w.population_std(2), 1.0, 1e-12);
    }

    #[test]
    fn single_observation_has_zero_std() {
        let mut w = RollingWindow::new(10);
        w.push(1, 100.0);
        assert_eq!(w.population_std(10), 0.0);
    }

    #[test]
    fn mean_waits_for_full_window() {
        let mut w = RollingWindow::new(5);
        w.push(1, 10.0);
        w.push(2, 20.0);
        assert_eq!(w.full_mean(3), None);
        w.push(3, 30.0);
        assert_eq!(w.full_mean(3), Some(20.0));
    }
}
