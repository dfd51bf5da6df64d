//! Exact (and approximate) probability mass functions of the special count `K`.
//!
//! [`Distribution::exact`] computes the full PMF of `K = 0..=max_k` once per configuration
//! (see [`SelectionConfig::max_k`]):
//!
//! - **Without replacement** (hypergeometric):
//!   `P[k] = choose(r, k) * choose(N - r, n - k) / choose(N, n)`
//! - **With replacement** (binomial, `p = r / N`):
//!   `P[k] = choose(n, k) * p^k * (1 - p)^(n - k)`
//!
//! Every PMF is renormalized by the sum of its weights, absorbing accumulated rounding error.
//! If all weights vanish (or any is non-finite) the computation fails with
//! [`DistributionError::Degenerate`] rather than returning a uniform or all-zero PMF.
//!
//! # Precision
//!
//! All arithmetic is `f64`. The hypergeometric weights use the direct multiplicative
//! [`choose`] while `choose(N, n)` is finite, and switch to log-space ([`ln_choose`]) once it
//! overflows (roughly `N > 1000` with `n` near `N / 2`). Relative error stays around `1e-13`
//! in the direct regime and `1e-11` in log-space; neither is exact rational arithmetic.

use std::fmt;

use selprob_stats::{
    combinatorics::{binomial_point_mass, choose, ln_choose},
    moments::Moments,
    special::{ln_factorial, normal_cdf},
};
use serde::{Deserialize, Serialize};

use crate::{
    config::{ConfigError, SamplingRegime, SelectionConfig},
    query::Query,
};

/// Failure to produce a distribution.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum DistributionError {
    #[display("invalid configuration: {_0}")]
    Config(ConfigError),
    #[display("all {support} probability weights vanished or overflowed before renormalization")]
    Degenerate { support: usize },
}

impl From<ConfigError> for DistributionError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Model used to compute a [`Distribution`].
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::IsVariant,
    derive_more::FromStr,
)]
#[serde(rename_all = "snake_case")]
pub enum Approximation {
    /// The exact hypergeometric or binomial law.
    #[default]
    Exact,
    /// Normal law with the exact mean and variance, with continuity correction.
    Normal,
    /// Poisson law with `lambda = n * r / N`.
    Poisson,
}

impl fmt::Display for Approximation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => f.write_str("exact"),
            Self::Normal => f.write_str("normal approximation"),
            Self::Poisson => f.write_str("Poisson approximation"),
        }
    }
}

/// Warning that an approximation is used outside its usual validity range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// The normal approximation wants `np >= 10` and `n(1 - p) >= 10`.
    WeakNormalApproximation { np: f64, nq: f64 },
    /// The Poisson approximation wants `np <= 10`.
    WeakPoissonApproximation { lambda: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WeakNormalApproximation { np, nq } => write!(
                f,
                "normal approximation works best when np >= 10 and n(1-p) >= 10 (np = {np:.1}, n(1-p) = {nq:.1})"
            ),
            Self::WeakPoissonApproximation { lambda } => write!(
                f,
                "Poisson approximation works best when np <= 10 (np = {lambda:.1})"
            ),
        }
    }
}

/// Probability mass function of the number of special items in a sample.
///
/// Immutable once computed. Index `k` of [`Self::probabilities`] holds `P(K = k)` for
/// `k = 0..=max_k`; every `k` beyond the support has probability 0.
///
/// # Example
///
/// ```
/// use selprob_engine::{Distribution, Query, SamplingRegime, SelectionConfig};
///
/// let config = SelectionConfig::new(10, 3, 4, SamplingRegime::WithoutReplacement).unwrap();
/// let distribution = Distribution::exact(&config).unwrap();
///
/// assert_eq!(distribution.probabilities().len(), 4);
/// assert!((distribution.probability(1) - 0.5).abs() < 1e-12);
/// assert_eq!(distribution.probability(4), 0.0);
/// assert!((distribution.evaluate(Query::AtLeastOne) - 5.0 / 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Distribution {
    config: SelectionConfig,
    model: Approximation,
    probabilities: Vec<f64>,
}

/// Computes the exact distribution from raw parameters.
///
/// Shorthand for [`SelectionConfig::new`] followed by [`Distribution::exact`].
pub fn exact_distribution(
    population_size: usize,
    special_count: usize,
    sample_size: usize,
    regime: SamplingRegime,
) -> Result<Distribution, DistributionError> {
    let config = SelectionConfig::new(population_size, special_count, sample_size, regime)?;
    Distribution::exact(&config)
}

impl Distribution {
    /// Computes the exact hypergeometric or binomial distribution for `config`.
    pub fn exact(config: &SelectionConfig) -> Result<Self, DistributionError> {
        Self::with_model(config, Approximation::Exact)
    }

    /// Computes the distribution for `config` using the given model.
    pub fn with_model(
        config: &SelectionConfig,
        model: Approximation,
    ) -> Result<Self, DistributionError> {
        let weights = match model {
            Approximation::Exact => match config.regime() {
                SamplingRegime::WithoutReplacement => hypergeometric_weights(config),
                SamplingRegime::WithReplacement => binomial_weights(config),
            },
            Approximation::Normal => normal_weights(config),
            Approximation::Poisson => poisson_weights(config),
        };
        let probabilities = renormalize(weights)?;
        Ok(Self {
            config: *config,
            model,
            probabilities,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    #[must_use]
    pub const fn model(&self) -> Approximation {
        self.model
    }

    /// Largest `k` in the support. See [`SelectionConfig::max_k`].
    #[must_use]
    pub const fn max_k(&self) -> usize {
        self.config.max_k()
    }

    /// `P(K = k)` for `k = 0..=max_k`.
    #[must_use]
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// `P(K = k)`, or 0 when `k` is outside the support.
    #[must_use]
    pub fn probability(&self, k: usize) -> f64 {
        self.probabilities.get(k).copied().unwrap_or(0.0)
    }

    /// `P(K <= k)`. Reaches the full mass at `k >= max_k`.
    #[must_use]
    pub fn cumulative(&self, k: usize) -> f64 {
        let end = usize::min(k, self.max_k());
        self.probabilities[..=end].iter().sum()
    }

    /// Running cumulative probabilities `P(K <= k)` for `k = 0..=max_k`.
    #[must_use]
    pub fn cumulative_probabilities(&self) -> Vec<f64> {
        self.probabilities
            .iter()
            .scan(0.0, |acc, p| {
                *acc += p;
                Some(*acc)
            })
            .collect()
    }

    /// Expected number of special items, `E[K] = sum(k * P[k])`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn expected_value(&self) -> f64 {
        self.probabilities
            .iter()
            .enumerate()
            .map(|(k, p)| k as f64 * p)
            .sum()
    }

    /// Mean, variance, standard deviation and skewness of `K`.
    #[must_use]
    pub fn moments(&self) -> Moments {
        // Renormalization guarantees a positive finite total.
        Moments::from_weights(&self.probabilities).unwrap_or(Moments {
            mean: 0.0,
            variance: 0.0,
            std_dev: 0.0,
            skewness: 0.0,
        })
    }

    /// Smallest `k` with `P(K <= k) >= q`.
    ///
    /// `q` is clamped into `[0, 1]`; `quantile(1.0)` may return `max_k` even when the
    /// rounded cumulative sum falls a few ulps short of 1.
    #[must_use]
    pub fn quantile(&self, q: f64) -> usize {
        let q = q.clamp(0.0, 1.0);
        let mut acc = 0.0;
        for (k, p) in self.probabilities.iter().enumerate() {
            acc += p;
            if acc >= q {
                return k;
            }
        }
        self.max_k()
    }

    /// Most likely `k` (the first one if several tie).
    #[must_use]
    pub fn mode(&self) -> usize {
        let mut best = 0;
        for (k, &p) in self.probabilities.iter().enumerate() {
            if p > self.probabilities[best] {
                best = k;
            }
        }
        best
    }

    /// Evaluates a query against this distribution. See [`Query::probability`].
    #[must_use]
    pub fn evaluate(&self, query: Query) -> f64 {
        query.probability(self)
    }

    /// Reports when [`Self::model`] is an approximation used outside its validity range.
    ///
    /// The exact model never produces advisories.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        let n = self.config.sample_size() as f64;
        let p = self.config.population().special_fraction();
        let np = n * p;
        let nq = n * (1.0 - p);
        match self.model {
            Approximation::Exact => vec![],
            Approximation::Normal if np < 10.0 || nq < 10.0 => {
                vec![Advisory::WeakNormalApproximation { np, nq }]
            }
            Approximation::Poisson if np > 10.0 => {
                vec![Advisory::WeakPoissonApproximation { lambda: np }]
            }
            Approximation::Normal | Approximation::Poisson => vec![],
        }
    }
}

/// Evaluates a query against a distribution.
#[must_use]
pub fn evaluate(distribution: &Distribution, query: Query) -> f64 {
    distribution.evaluate(query)
}

fn hypergeometric_weights(config: &SelectionConfig) -> Vec<f64> {
    let population = config.population_size();
    let special = config.special_count();
    let non_special = population - special;
    let n = config.sample_size();

    let denominator = choose(population, n);
    let ln_denominator = ln_choose(population, n);
    let ln_weight =
        |k: usize| (ln_choose(special, k) + ln_choose(non_special, n - k) - ln_denominator).exp();
    (0..=config.max_k())
        .map(|k| {
            // Fewer non-special items than non-special draws: `choose(r, k)` may overflow
            // while the other factor is zero.
            if n - k > non_special {
                return 0.0;
            }
            if !denominator.is_finite() {
                return ln_weight(k);
            }
            let weight = choose(special, k) * choose(non_special, n - k) / denominator;
            if weight.is_finite() {
                weight
            } else {
                ln_weight(k)
            }
        })
        .collect()
}

fn binomial_weights(config: &SelectionConfig) -> Vec<f64> {
    let n = config.sample_size();
    let p = config.population().special_fraction();
    (0..=config.max_k())
        .map(|k| binomial_point_mass(n, k, p))
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn normal_weights(config: &SelectionConfig) -> Vec<f64> {
    let population = config.population_size() as f64;
    let n = config.sample_size() as f64;
    let p = config.population().special_fraction();
    let mean = n * p;
    let mut variance = n * p * (1.0 - p);
    if config.regime().is_without_replacement() {
        // Finite-population correction.
        variance *= if population > 1.0 {
            (population - n) / (population - 1.0)
        } else {
            0.0
        };
    }
    let sigma = variance.max(0.0).sqrt();
    (0..=config.max_k())
        .map(|k| {
            let k = k as f64;
            (normal_cdf(k + 0.5, mean, sigma) - normal_cdf(k - 0.5, mean, sigma)).max(0.0)
        })
        .collect()
}

#[expect(clippy::cast_precision_loss)]
fn poisson_weights(config: &SelectionConfig) -> Vec<f64> {
    let lambda = config.sample_size() as f64 * config.population().special_fraction();
    (0..=config.max_k())
        .map(|k| {
            if lambda <= 0.0 {
                if k == 0 { 1.0 } else { 0.0 }
            } else {
                (k as f64 * lambda.ln() - lambda - ln_factorial(k)).exp()
            }
        })
        .collect()
}

fn renormalize(weights: Vec<f64>) -> Result<Vec<f64>, DistributionError> {
    let support = weights.len();
    let total = weights.iter().sum::<f64>();
    let valid = weights.iter().all(|w| w.is_finite() && *w >= 0.0);
    if !valid || !total.is_finite() || total <= 0.0 {
        return Err(DistributionError::Degenerate { support });
    }
    Ok(weights.into_iter().map(|w| w / total).collect())
}
