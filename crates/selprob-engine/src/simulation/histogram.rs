use selprob_stats::moments::Moments;
use serde::Serialize;

use crate::config::SelectionConfig;

use super::SimulationError;

/// Frequency counts of simulated special counts.
///
/// `counts()[k]` is the number of simulated samples that contained exactly `k` special items,
/// for `k = 0..=max_k`. The counts always add up to [`Self::total_draws`].
///
/// # Example
///
/// ```
/// use selprob_engine::SimulationHistogram;
///
/// let mut histogram = SimulationHistogram::new(3);
/// histogram.record(1);
/// histogram.record(1);
/// histogram.record(3);
///
/// assert_eq!(histogram.counts(), &[0, 2, 0, 1]);
/// assert_eq!(histogram.total_draws(), 3);
/// assert_eq!(histogram.frequency(1), Some(2.0 / 3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationHistogram {
    counts: Vec<u64>,
    total_draws: u64,
}

impl SimulationHistogram {
    /// Creates an empty histogram for outcomes `0..=max_k`.
    #[must_use]
    pub fn new(max_k: usize) -> Self {
        Self {
            counts: vec![0; max_k + 1],
            total_draws: 0,
        }
    }

    /// Creates an empty histogram sized for the support of `config`.
    #[must_use]
    pub fn for_config(config: &SelectionConfig) -> Self {
        Self::new(config.max_k())
    }

    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    #[must_use]
    pub const fn total_draws(&self) -> u64 {
        self.total_draws
    }

    /// Largest outcome this histogram can hold.
    #[must_use]
    pub fn max_k(&self) -> usize {
        self.counts.len() - 1
    }

    /// Number of samples with exactly `k` special items; 0 outside the support.
    #[must_use]
    pub fn count(&self, k: usize) -> u64 {
        self.counts.get(k).copied().unwrap_or(0)
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.total_draws == 0
    }

    /// Relative frequency of `k`, or `None` before the first draw.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn frequency(&self, k: usize) -> Option<f64> {
        (!self.is_empty()).then(|| self.count(k) as f64 / self.total_draws as f64)
    }

    /// Records one simulated sample containing `k` special items.
    ///
    /// # Panics
    ///
    /// Panics if `k > max_k`. Samplers built from the same configuration never produce such
    /// an outcome.
    pub fn record(&mut self, k: usize) {
        self.counts[k] += 1;
        self.total_draws += 1;
    }

    /// Resets every count to zero.
    pub fn clear(&mut self) {
        self.counts.fill(0);
        self.total_draws = 0;
    }

    /// Adds the counts of `other` into `self`.
    ///
    /// Both histograms must cover the same support.
    pub fn merge(&mut self, other: &Self) -> Result<(), SimulationError> {
        if self.counts.len() != other.counts.len() {
            return Err(SimulationError::HistogramMismatch {
                expected: self.max_k(),
                actual: other.max_k(),
            });
        }
        for (count, add) in self.counts.iter_mut().zip(&other.counts) {
            *count += add;
        }
        self.total_draws += other.total_draws;
        Ok(())
    }

    /// Empirical mean, variance and skewness, or `None` before the first draw.
    #[must_use]
    pub fn moments(&self) -> Option<Moments> {
        Moments::from_counts(&self.counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram_of(max_k: usize, outcomes: &[usize]) -> SimulationHistogram {
        let mut histogram = SimulationHistogram::new(max_k);
        for &k in outcomes {
            histogram.record(k);
        }
        histogram
    }

    #[test]
    fn test_counts_sum_to_total() {
        let histogram = histogram_of(4, &[0, 1, 1, 4, 2, 1]);
        assert_eq!(histogram.counts().iter().sum::<u64>(), histogram.total_draws());
        assert_eq!(histogram.total_draws(), 6);
        assert_eq!(histogram.count(1), 3);
        assert_eq!(histogram.count(99), 0);
    }

    #[test]
    fn test_empty_histogram_has_no_frequencies() {
        let histogram = SimulationHistogram::new(2);
        assert!(histogram.is_empty());
        assert_eq!(histogram.frequency(0), None);
        assert_eq!(histogram.moments(), None);
    }

    #[test]
    fn test_clear() {
        let mut histogram = histogram_of(2, &[0, 2, 2]);
        histogram.clear();
        assert_eq!(histogram, SimulationHistogram::new(2));
    }

    #[test]
    fn test_merge_adds_counts() {
        let mut a = histogram_of(2, &[0, 1]);
        let b = histogram_of(2, &[1, 2, 2]);
        a.merge(&b).unwrap();
        assert_eq!(a.counts(), &[1, 2, 2]);
        assert_eq!(a.total_draws(), 5);
    }

    #[test]
    fn test_merge_rejects_different_support() {
        let mut a = SimulationHistogram::new(2);
        let b = SimulationHistogram::new(3);
        assert_eq!(
            a.merge(&b),
            Err(SimulationError::HistogramMismatch {
                expected: 2,
                actual: 3
            })
        );
    }

    #[test]
    fn test_moments() {
        let histogram = histogram_of(2, &[0, 2, 0, 2]);
        let moments = histogram.moments().unwrap();
        assert!((moments.mean - 1.0).abs() < 1e-12);
        assert!((moments.variance - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_json_format() {
        let histogram = histogram_of(2, &[1, 1, 2]);
        let json = serde_json::to_string(&histogram).unwrap();
        assert_eq!(json, r#"{"counts":[0,2,1],"total_draws":3}"#);
    }
}
