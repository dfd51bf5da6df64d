//! Questions asked of a distribution or of a simulation histogram.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{distribution::Distribution, simulation::SimulationHistogram};

/// A probability question about the special count `K`.
///
/// Values of `k` outside the support are not errors: they describe impossible outcomes and
/// evaluate to probability 0.
///
/// The textual form accepted by [`FromStr`] (and produced by [`fmt::Display`]) is one of
/// `exactly:K`, `at-least-one`, `at-least:K`, `at-most:K` or `between:LO:HI`.
///
/// # Example
///
/// ```
/// use selprob_engine::Query;
///
/// let query: Query = "exactly:2".parse().unwrap();
/// assert_eq!(query, Query::ExactlyK { k: 2 });
/// assert_eq!("at-least-one".parse::<Query>().unwrap(), Query::AtLeastOne);
/// assert!("sometimes".parse::<Query>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Query {
    /// `P(K = k)`
    ExactlyK { k: usize },
    /// `P(K >= 1)`, always evaluated as `1 - P(K = 0)`.
    AtLeastOne,
    /// `P(K >= k)`
    AtLeast { k: usize },
    /// `P(K <= k)`
    AtMost { k: usize },
    /// `P(lower <= K <= upper)`. Empty when `lower > upper`.
    Between { lower: usize, upper: usize },
}

/// Unrecognized query text.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display(
    "invalid query '{input}': expected exactly:K, at-least-one, at-least:K, at-most:K or between:LO:HI"
)]
pub struct ParseQueryError {
    input: String,
}

impl Query {
    /// Evaluates the query against a distribution.
    ///
    /// `AtLeastOne` is the single subtraction `1 - P[0]`, so it equals
    /// `1.0 - ExactlyK { k: 0 }.probability(d)` bit for bit. `AtLeast { k }` uses the same
    /// complement form over the lower tail.
    #[must_use]
    pub fn probability(self, distribution: &Distribution) -> f64 {
        match self {
            Self::ExactlyK { k } => distribution.probability(k),
            Self::AtLeastOne => 1.0 - distribution.probability(0),
            Self::AtLeast { k: 0 } => 1.0,
            Self::AtLeast { k } if k > distribution.max_k() => 0.0,
            Self::AtLeast { k } => 1.0 - distribution.cumulative(k - 1),
            Self::AtMost { k } => distribution.cumulative(k),
            Self::Between { lower, upper } => {
                let upper = usize::min(upper, distribution.max_k());
                (lower..=upper).map(|k| distribution.probability(k)).sum()
            }
        }
    }

    /// Evaluates the query against simulated counts.
    ///
    /// Returns `None` when nothing has been simulated yet; "no data" is never reported as a
    /// probability of zero.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn empirical_probability(self, histogram: &SimulationHistogram) -> Option<f64> {
        let total = histogram.total_draws();
        if total == 0 {
            return None;
        }
        let frequency = |count: u64| count as f64 / total as f64;
        let probability = match self {
            Self::ExactlyK { k } => frequency(histogram.count(k)),
            Self::AtLeastOne => 1.0 - frequency(histogram.count(0)),
            _ => frequency(
                histogram
                    .counts()
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| self.contains(*k))
                    .map(|(_, count)| count)
                    .sum(),
            ),
        };
        Some(probability)
    }

    /// Returns `true` if the outcome `K = k` satisfies the query.
    #[must_use]
    pub const fn contains(self, k: usize) -> bool {
        match self {
            Self::ExactlyK { k: target } => k == target,
            Self::AtLeastOne => k >= 1,
            Self::AtLeast { k: target } => k >= target,
            Self::AtMost { k: target } => k <= target,
            Self::Between { lower, upper } => lower <= k && k <= upper,
        }
    }

    /// The `k` a single-target query refers to, used to pick a cumulative probability to
    /// report alongside the answer.
    #[must_use]
    pub const fn target_k(self) -> Option<usize> {
        match self {
            Self::ExactlyK { k } | Self::AtLeast { k } | Self::AtMost { k } => Some(k),
            Self::AtLeastOne => Some(1),
            Self::Between { upper, .. } => Some(upper),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExactlyK { k } => write!(f, "exactly:{k}"),
            Self::AtLeastOne => f.write_str("at-least-one"),
            Self::AtLeast { k } => write!(f, "at-least:{k}"),
            Self::AtMost { k } => write!(f, "at-most:{k}"),
            Self::Between { lower, upper } => write!(f, "between:{lower}:{upper}"),
        }
    }
}

impl FromStr for Query {
    type Err = ParseQueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseQueryError {
            input: s.to_owned(),
        };
        let parse = |value: &str| value.trim().parse::<usize>().map_err(|_| err());

        let mut parts = s.trim().split(':');
        let mode = parts.next().unwrap_or_default();
        let query = match (mode, parts.next(), parts.next()) {
            ("exactly", Some(k), None) => Self::ExactlyK { k: parse(k)? },
            ("at-least-one", None, None) => Self::AtLeastOne,
            ("at-least", Some(k), None) => Self::AtLeast { k: parse(k)? },
            ("at-most", Some(k), None) => Self::AtMost { k: parse(k)? },
            ("between", Some(lower), Some(upper)) => Self::Between {
                lower: parse(lower)?,
                upper: parse(upper)?,
            },
            _ => return Err(err()),
        };
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SamplingRegime, SelectionConfig};

    fn distribution(
        population: usize,
        special: usize,
        sample: usize,
        regime: SamplingRegime,
    ) -> Distribution {
        let config = SelectionConfig::new(population, special, sample, regime).unwrap();
        Distribution::exact(&config).unwrap()
    }

    fn histogram(counts: &[u64]) -> SimulationHistogram {
        let mut histogram = SimulationHistogram::new(counts.len() - 1);
        for (k, &count) in counts.iter().enumerate() {
            for _ in 0..count {
                histogram.record(k);
            }
        }
        histogram
    }

    mod theoretical {
        use super::*;

        #[test]
        fn test_complement_identity_is_exact() {
            for (population, special, sample, regime) in [
                (200, 10, 40, SamplingRegime::WithoutReplacement),
                (100, 5, 50, SamplingRegime::WithReplacement),
                (120, 8, 20, SamplingRegime::WithoutReplacement),
                (7, 7, 3, SamplingRegime::WithoutReplacement),
            ] {
                let d = distribution(population, special, sample, regime);
                let at_least_one = Query::AtLeastOne.probability(&d);
                let exactly_zero = Query::ExactlyK { k: 0 }.probability(&d);
                assert_eq!(at_least_one.to_bits(), (1.0 - exactly_zero).to_bits());
            }
        }

        #[test]
        fn test_golden_scenarios() {
            let vip = distribution(200, 10, 40, SamplingRegime::WithoutReplacement);
            assert!((Query::AtLeastOne.probability(&vip) - 0.898_710_594_144_443_4).abs() < 1e-10);

            let ads = distribution(100, 5, 50, SamplingRegime::WithReplacement);
            assert!((Query::AtLeastOne.probability(&ads) - 0.923_055_024_723_286_8).abs() < 1e-10);

            let qc = distribution(120, 8, 20, SamplingRegime::WithoutReplacement);
            let exactly_two = Query::ExactlyK { k: 2 }.probability(&qc);
            assert!((exactly_two - 0.269_546_855_612_913_5).abs() < 1e-10);
        }

        #[test]
        fn test_out_of_support_is_zero() {
            let d = distribution(120, 8, 20, SamplingRegime::WithoutReplacement);
            assert_eq!(Query::ExactlyK { k: 9 }.probability(&d), 0.0);
            assert_eq!(Query::ExactlyK { k: 1000 }.probability(&d), 0.0);
            assert_eq!(Query::AtLeast { k: 9 }.probability(&d), 0.0);
            assert_eq!(
                Query::Between {
                    lower: 9,
                    upper: 20
                }
                .probability(&d),
                0.0
            );
        }

        #[test]
        fn test_tail_queries() {
            let d = distribution(10, 3, 4, SamplingRegime::WithoutReplacement);
            // PMF: [1/6, 1/2, 3/10, 1/30]
            assert_eq!(Query::AtLeast { k: 0 }.probability(&d), 1.0);
            assert!((Query::AtLeast { k: 2 }.probability(&d) - (1.0 / 3.0)).abs() < 1e-12);
            assert!((Query::AtMost { k: 1 }.probability(&d) - (2.0 / 3.0)).abs() < 1e-12);
            assert!((Query::AtMost { k: 99 }.probability(&d) - 1.0).abs() < 1e-12);
            let between = Query::Between { lower: 1, upper: 2 }.probability(&d);
            assert!((between - 0.8).abs() < 1e-12);
        }

        #[test]
        fn test_empty_between_is_zero() {
            let d = distribution(10, 3, 4, SamplingRegime::WithoutReplacement);
            assert_eq!(Query::Between { lower: 3, upper: 1 }.probability(&d), 0.0);
        }

        #[test]
        fn test_at_least_one_matches_at_least_1() {
            let d = distribution(120, 8, 20, SamplingRegime::WithoutReplacement);
            let a = Query::AtLeastOne.probability(&d);
            let b = Query::AtLeast { k: 1 }.probability(&d);
            assert!((a - b).abs() < 1e-15);
        }
    }

    mod empirical {
        use super::*;

        #[test]
        fn test_no_draws_is_unavailable() {
            let empty = SimulationHistogram::new(3);
            assert_eq!(Query::AtLeastOne.empirical_probability(&empty), None);
            assert_eq!(Query::ExactlyK { k: 0 }.empirical_probability(&empty), None);
        }

        #[test]
        fn test_frequencies() {
            let h = histogram(&[2, 5, 2, 1]);
            assert_eq!(Query::ExactlyK { k: 1 }.empirical_probability(&h), Some(0.5));
            assert_eq!(Query::AtLeastOne.empirical_probability(&h), Some(0.8));
            assert_eq!(Query::AtLeast { k: 2 }.empirical_probability(&h), Some(0.3));
            assert_eq!(Query::AtMost { k: 1 }.empirical_probability(&h), Some(0.7));
            assert_eq!(
                Query::Between { lower: 1, upper: 2 }.empirical_probability(&h),
                Some(0.7)
            );
            assert_eq!(Query::ExactlyK { k: 7 }.empirical_probability(&h), Some(0.0));
        }
    }

    mod parsing {
        use super::*;

        #[test]
        fn test_display_roundtrip() {
            for query in [
                Query::ExactlyK { k: 2 },
                Query::AtLeastOne,
                Query::AtLeast { k: 3 },
                Query::AtMost { k: 0 },
                Query::Between { lower: 1, upper: 4 },
            ] {
                assert_eq!(query.to_string().parse::<Query>().unwrap(), query);
            }
        }

        #[test]
        fn test_rejects_malformed() {
            for input in [
                "",
                "exactly",
                "exactly:",
                "exactly:-1",
                "exactly:2:3",
                "at-least-one:1",
                "between:1",
                "between:1:2:3",
                "most:2",
            ] {
                let err = input.parse::<Query>().unwrap_err();
                assert!(err.to_string().contains("invalid query"), "{input}");
            }
        }

        #[test]
        fn test_json_format() {
            let json = serde_json::to_string(&Query::ExactlyK { k: 2 }).unwrap();
            assert_eq!(json, r#"{"mode":"exactly_k","k":2}"#);
            let json = serde_json::to_string(&Query::AtLeastOne).unwrap();
            assert_eq!(json, r#"{"mode":"at_least_one"}"#);
            let parsed: Query = serde_json::from_str(r#"{"mode":"between","lower":1,"upper":3}"#)
                .unwrap();
            assert_eq!(parsed, Query::Between { lower: 1, upper: 3 });
        }
    }
}
