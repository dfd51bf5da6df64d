//! Side-by-side comparison of the exact distribution and the simulated histogram.

use serde::Serialize;

use crate::{distribution::Distribution, query::Query, simulation::SimulationHistogram};

/// Comparable metrics for one query.
///
/// `empirical_p` and `empirical_mean` are `None` until at least one sample has been
/// simulated: "not measured yet" is kept apart from "measured zero".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub query: Query,
    /// The query evaluated on the distribution.
    pub theoretical_p: f64,
    /// The query evaluated on the histogram.
    pub empirical_p: Option<f64>,
    /// `E[K]` under the distribution.
    pub expected_k: f64,
    /// Mean special count over the simulated samples.
    pub empirical_mean: Option<f64>,
    /// `P(K <= k)` for `k = 0..=max_k`.
    pub cumulative: Vec<f64>,
    pub total_draws: u64,
}

impl Summary {
    /// `P(K <= k)`; the full mass for every `k` beyond the support.
    #[must_use]
    pub fn cumulative_p(&self, k: usize) -> f64 {
        self.cumulative
            .get(k)
            .or(self.cumulative.last())
            .copied()
            .unwrap_or(0.0)
    }

    /// Absolute difference between the theoretical and empirical answers.
    #[must_use]
    pub fn discrepancy(&self) -> Option<f64> {
        self.empirical_p.map(|p| (p - self.theoretical_p).abs())
    }
}

/// Compares `distribution` and `histogram` on `query`.
///
/// # Example
///
/// ```
/// use selprob_engine::{Distribution, Query, SamplingRegime, SelectionConfig};
/// use selprob_engine::{SimulationHistogram, summarize};
///
/// let config = SelectionConfig::new(10, 3, 4, SamplingRegime::WithoutReplacement).unwrap();
/// let distribution = Distribution::exact(&config).unwrap();
/// let histogram = SimulationHistogram::for_config(&config);
///
/// let summary = summarize(&distribution, &histogram, Query::ExactlyK { k: 1 });
/// assert!((summary.theoretical_p - 0.5).abs() < 1e-12);
/// assert_eq!(summary.empirical_p, None);
/// assert!((summary.cumulative_p(3) - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn summarize(
    distribution: &Distribution,
    histogram: &SimulationHistogram,
    query: Query,
) -> Summary {
    Summary {
        query,
        theoretical_p: query.probability(distribution),
        empirical_p: query.empirical_probability(histogram),
        expected_k: distribution.expected_value(),
        empirical_mean: histogram.moments().map(|m| m.mean),
        cumulative: distribution.cumulative_probabilities(),
        total_draws: histogram.total_draws(),
    }
}

/// One row of a [`DistributionTable`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DistributionRow {
    pub k: usize,
    /// `P(K = k)`
    pub exact: f64,
    /// Number of simulated samples with `K = k`, `None` before the first draw.
    pub frequency: Option<u64>,
    /// `frequency / total_draws`
    pub empirical: Option<f64>,
    /// `P(K <= k)`
    pub cumulative: f64,
}

/// Exact and simulated probabilities for every `k` in the support.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionTable {
    pub rows: Vec<DistributionRow>,
    pub total_draws: u64,
    /// First `k` of maximal exact probability.
    pub most_likely_k: usize,
}

impl DistributionTable {
    /// Row of the most likely `k`, the natural worked example for the formula.
    #[must_use]
    pub fn example_row(&self) -> Option<&DistributionRow> {
        self.rows.get(self.most_likely_k)
    }
}

/// Tabulates `distribution` next to `histogram`.
///
/// The histogram must come from the same configuration; a `k` missing from it counts as
/// zero occurrences.
#[must_use]
pub fn distribution_table(
    distribution: &Distribution,
    histogram: &SimulationHistogram,
) -> DistributionTable {
    let simulated = !histogram.is_empty();
    let rows = distribution
        .probabilities()
        .iter()
        .zip(distribution.cumulative_probabilities())
        .enumerate()
        .map(|(k, (&exact, cumulative))| DistributionRow {
            k,
            exact,
            frequency: simulated.then(|| histogram.count(k)),
            empirical: histogram.frequency(k),
            cumulative,
        })
        .collect();
    DistributionTable {
        rows,
        total_draws: histogram.total_draws(),
        most_likely_k: distribution.mode(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SamplingRegime, SelectionConfig};

    fn setup(counts: &[usize]) -> (Distribution, SimulationHistogram) {
        let config = SelectionConfig::new(10, 3, 4, SamplingRegime::WithoutReplacement).unwrap();
        let distribution = Distribution::exact(&config).unwrap();
        let mut histogram = SimulationHistogram::for_config(&config);
        for (k, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                histogram.record(k);
            }
        }
        (distribution, histogram)
    }

    mod summary {
        use super::*;

        #[test]
        fn test_before_simulation() {
            let (distribution, histogram) = setup(&[]);
            let summary = summarize(&distribution, &histogram, Query::AtLeastOne);
            assert!((summary.theoretical_p - 5.0 / 6.0).abs() < 1e-12);
            assert_eq!(summary.empirical_p, None);
            assert_eq!(summary.empirical_mean, None);
            assert_eq!(summary.discrepancy(), None);
            assert_eq!(summary.total_draws, 0);
            assert!((summary.expected_k - 1.2).abs() < 1e-12);
        }

        #[test]
        fn test_after_simulation() {
            let (distribution, histogram) = setup(&[1, 2, 1, 0]);
            let summary = summarize(&distribution, &histogram, Query::AtLeastOne);
            assert_eq!(summary.empirical_p, Some(0.75));
            assert_eq!(summary.empirical_mean, Some(1.0));
            assert!((summary.discrepancy().unwrap() - (5.0 / 6.0 - 0.75)).abs() < 1e-12);
        }

        #[test]
        fn test_cumulative_is_monotone_and_saturates() {
            let (distribution, histogram) = setup(&[]);
            let summary = summarize(&distribution, &histogram, Query::ExactlyK { k: 2 });
            assert!(summary.cumulative.is_sorted_by(|a, b| a <= b));
            assert!((summary.cumulative_p(0) - 1.0 / 6.0).abs() < 1e-12);
            assert!((summary.cumulative_p(3) - 1.0).abs() < 1e-12);
            assert_eq!(summary.cumulative_p(40), summary.cumulative_p(3));
        }
    }

    mod table {
        use super::*;

        #[test]
        fn test_rows_without_simulation() {
            let (distribution, histogram) = setup(&[]);
            let table = distribution_table(&distribution, &histogram);
            assert_eq!(table.rows.len(), 4);
            assert!(table.rows.iter().all(|row| row.frequency.is_none()));
            assert!(table.rows.iter().all(|row| row.empirical.is_none()));
            assert_eq!(table.most_likely_k, 1);
            let example = table.example_row().unwrap();
            assert_eq!(example.k, 1);
            assert!((example.exact - 0.5).abs() < 1e-12);
        }

        #[test]
        fn test_rows_with_simulation() {
            let (distribution, histogram) = setup(&[1, 2, 1, 0]);
            let table = distribution_table(&distribution, &histogram);
            assert_eq!(table.total_draws, 4);
            let frequencies = table.rows.iter().map(|r| r.frequency).collect::<Vec<_>>();
            assert_eq!(frequencies, vec![Some(1), Some(2), Some(1), Some(0)]);
            assert_eq!(table.rows[3].empirical, Some(0.0));
            assert!((table.rows[3].cumulative - 1.0).abs() < 1e-12);
        }
    }
}
