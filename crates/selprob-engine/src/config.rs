//! Population and sample configuration.
//!
//! Populations are never materialized: the special items are, by convention, the index
//! prefix `[0, r)` of the index space `[0, N)`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Invalid population or sample parameters.
///
/// The engine refuses these instead of clamping, since a clamped configuration would
/// describe a different scenario from the one requested.
#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("population size N must be at least 1")]
    EmptyPopulation,
    #[display("special count r = {special} cannot exceed population size N = {population}")]
    TooManySpecial { population: usize, special: usize },
    #[display("sample size n must be at least 1")]
    EmptySample,
    #[display(
        "sample size n = {sample} cannot exceed population size N = {population} when sampling without replacement"
    )]
    SampleExceedsPopulation { population: usize, sample: usize },
    #[display("success probability p = {probability} must lie in [0, 1]")]
    InvalidProbability { probability: f64 },
}

/// How items are drawn from the population.
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
)]
#[serde(rename_all = "snake_case")]
pub enum SamplingRegime {
    /// Each item can be drawn at most once (hypergeometric law).
    #[default]
    WithoutReplacement,
    /// Each draw is independent; items may repeat (binomial law).
    WithReplacement,
}

impl fmt::Display for SamplingRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WithoutReplacement => f.write_str("without replacement"),
            Self::WithReplacement => f.write_str("with replacement"),
        }
    }
}

/// A population of `N` items of which `r` are special.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Population {
    size: usize,
    special: usize,
}

impl Population {
    /// Creates a population of `size` items with `special` special items.
    pub fn new(size: usize, special: usize) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptyPopulation);
        }
        if special > size {
            return Err(ConfigError::TooManySpecial {
                population: size,
                special,
            });
        }
        Ok(Self { size, special })
    }

    /// Total number of items `N`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Number of special items `r`.
    #[must_use]
    pub const fn special(&self) -> usize {
        self.special
    }

    /// Fraction of special items `r / N`.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn special_fraction(&self) -> f64 {
        self.special as f64 / self.size as f64
    }

    /// Returns `true` if the item at `index` is special.
    #[must_use]
    pub const fn is_special(&self, index: usize) -> bool {
        index < self.special
    }
}

/// Sample size and sampling regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SampleSpec {
    size: usize,
    regime: SamplingRegime,
}

impl SampleSpec {
    /// Creates a sample specification. The size must be at least 1.
    pub fn new(size: usize, regime: SamplingRegime) -> Result<Self, ConfigError> {
        if size == 0 {
            return Err(ConfigError::EmptySample);
        }
        Ok(Self { size, regime })
    }

    /// Number of draws `n`.
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub const fn regime(&self) -> SamplingRegime {
        self.regime
    }
}

/// A validated population together with a compatible sample specification.
///
/// This is the full input of the exact distribution engine and of the simulation engine.
/// Deserialization runs the same validation as [`SelectionConfig::new`].
///
/// # Example
///
/// ```
/// use selprob_engine::{ConfigError, SamplingRegime, SelectionConfig};
///
/// let config = SelectionConfig::new(200, 10, 40, SamplingRegime::WithoutReplacement).unwrap();
/// assert_eq!(config.max_k(), 10);
///
/// let err = SelectionConfig::new(10, 3, 11, SamplingRegime::WithoutReplacement).unwrap_err();
/// assert!(matches!(err, ConfigError::SampleExceedsPopulation { .. }));
///
/// // Sampling with replacement may draw more items than the population holds.
/// assert!(SelectionConfig::new(10, 3, 11, SamplingRegime::WithReplacement).is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "RawSelectionConfig", try_from = "RawSelectionConfig")]
pub struct SelectionConfig {
    population: Population,
    sample: SampleSpec,
}

impl SelectionConfig {
    /// Population size used by [`Self::bernoulli_trials`].
    pub const TRIAL_RESOLUTION: usize = 1_000_000;

    /// Validates and creates a configuration from raw counts.
    pub fn new(
        population_size: usize,
        special_count: usize,
        sample_size: usize,
        regime: SamplingRegime,
    ) -> Result<Self, ConfigError> {
        let population = Population::new(population_size, special_count)?;
        let sample = SampleSpec::new(sample_size, regime)?;
        Self::from_parts(population, sample)
    }

    /// Models `trials` independent trials that each succeed with `probability`.
    ///
    /// Bernoulli trials are draws with replacement from an urn whose special fraction is the
    /// success probability, so the configuration is the urn of [`Self::TRIAL_RESOLUTION`]
    /// items with `round(probability * TRIAL_RESOLUTION)` special ones. Probabilities are
    /// resolved to six decimal places; the binomial law, the approximations and both draw
    /// methods then apply unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use selprob_engine::{SamplingRegime, SelectionConfig};
    ///
    /// let config = SelectionConfig::bernoulli_trials(12, 0.37).unwrap();
    /// assert_eq!(config.regime(), SamplingRegime::WithReplacement);
    /// assert_eq!(config.population().special_fraction(), 0.37);
    /// assert_eq!(config.max_k(), 12);
    /// ```
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    pub fn bernoulli_trials(trials: usize, probability: f64) -> Result<Self, ConfigError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(ConfigError::InvalidProbability { probability });
        }
        let special = (probability * Self::TRIAL_RESOLUTION as f64).round() as usize;
        Self::new(
            Self::TRIAL_RESOLUTION,
            special,
            trials,
            SamplingRegime::WithReplacement,
        )
    }

    /// Combines an already validated population and sample.
    pub fn from_parts(population: Population, sample: SampleSpec) -> Result<Self, ConfigError> {
        if sample.regime.is_without_replacement() && sample.size > population.size {
            return Err(ConfigError::SampleExceedsPopulation {
                population: population.size,
                sample: sample.size,
            });
        }
        Ok(Self { population, sample })
    }

    #[must_use]
    pub const fn population(&self) -> &Population {
        &self.population
    }

    #[must_use]
    pub const fn sample(&self) -> &SampleSpec {
        &self.sample
    }

    #[must_use]
    pub const fn population_size(&self) -> usize {
        self.population.size
    }

    #[must_use]
    pub const fn special_count(&self) -> usize {
        self.population.special
    }

    #[must_use]
    pub const fn sample_size(&self) -> usize {
        self.sample.size
    }

    #[must_use]
    pub const fn regime(&self) -> SamplingRegime {
        self.sample.regime
    }

    /// Largest possible number of special draws in a sample.
    ///
    /// Without replacement this is `min(r, n)`. With replacement the same special item can
    /// be drawn repeatedly, so any of the `n` draws may be special: the support is `0..=n`
    /// whenever `r > 0`.
    #[must_use]
    pub const fn max_k(&self) -> usize {
        let special = self.population.special;
        let sample = self.sample.size;
        match self.sample.regime {
            SamplingRegime::WithoutReplacement if special < sample => special,
            SamplingRegime::WithoutReplacement => sample,
            SamplingRegime::WithReplacement if special == 0 => 0,
            SamplingRegime::WithReplacement => sample,
        }
    }
}

impl fmt::Display for SelectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "N = {}, r = {}, n = {} ({})",
            self.population_size(),
            self.special_count(),
            self.sample_size(),
            self.regime()
        )
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawSelectionConfig {
    population_size: usize,
    special_count: usize,
    sample_size: usize,
    #[serde(default)]
    regime: SamplingRegime,
}

impl From<SelectionConfig> for RawSelectionConfig {
    fn from(config: SelectionConfig) -> Self {
        Self {
            population_size: config.population_size(),
            special_count: config.special_count(),
            sample_size: config.sample_size(),
            regime: config.regime(),
        }
    }
}

impl TryFrom<RawSelectionConfig> for SelectionConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSelectionConfig) -> Result<Self, Self::Error> {
        Self::new(
            raw.population_size,
            raw.special_count,
            raw.sample_size,
            raw.regime,
        )
    }
}
