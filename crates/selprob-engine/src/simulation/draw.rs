use std::{collections::BTreeMap, fmt};

use rand::Rng;
use rand_distr::{Binomial, Distribution as _, Hypergeometric};
use serde::{Deserialize, Serialize};

use crate::config::{SamplingRegime, SelectionConfig};

use super::{SimulationError, SimulationHistogram};

/// A single realized sample.
///
/// Holds the drawn item indices in draw order together with the number of special items
/// among them. Without replacement every index appears at most once; with replacement an
/// index may repeat up to `n` times.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DrawResult {
    indices: Vec<usize>,
    special_count: usize,
}

impl DrawResult {
    /// Drawn item indices, in draw order.
    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of drawn indices that refer to a special item, `k`.
    #[must_use]
    pub const fn special_count(&self) -> usize {
        self.special_count
    }

    #[must_use]
    pub fn sample_size(&self) -> usize {
        self.indices.len()
    }

    /// How many times `index` appears in the sample.
    #[must_use]
    pub fn multiplicity(&self, index: usize) -> usize {
        self.indices.iter().filter(|&&i| i == index).count()
    }

    /// Every distinct drawn index with the number of times it was drawn.
    #[must_use]
    pub fn multiplicities(&self) -> BTreeMap<usize, usize> {
        let mut map = BTreeMap::new();
        for &index in &self.indices {
            *map.entry(index).or_default() += 1;
        }
        map
    }
}

/// How [`draw_many`] produces the special count of each trial.
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
pub enum DrawMethod {
    /// Draw item indices for every trial and count the special ones.
    #[default]
    Indexed,
    /// Sample the special count directly from the hypergeometric or binomial law.
    ///
    /// Only the final trial draws indices, so that a [`DrawResult`] is still available.
    Direct,
}

impl fmt::Display for DrawMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Indexed => f.write_str("indexed"),
            Self::Direct => f.write_str("direct"),
        }
    }
}

/// Draws samples for a fixed configuration.
///
/// Without replacement, the sampler keeps a permutation of the index space `[0, N)` and
/// runs a partial Fisher-Yates shuffle over its first `n` positions for each draw: `n` swaps,
/// after which the prefix is a uniformly random `n`-subset. The permutation is reused across
/// draws; a partial shuffle starting from any permutation is still uniform, so the pool is
/// never rebuilt.
///
/// With replacement, each of the `n` draws is an independent uniform index in `[0, N)`.
///
/// # Example
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use selprob_engine::{Sampler, SamplingRegime, SelectionConfig};
///
/// let config = SelectionConfig::new(10, 3, 4, SamplingRegime::WithoutReplacement).unwrap();
/// let mut sampler = Sampler::new(config);
/// let mut rng = Pcg32::seed_from_u64(7);
///
/// let draw = sampler.draw(&mut rng);
/// assert_eq!(draw.sample_size(), 4);
/// assert!(draw.special_count() <= 3);
/// assert!(draw.multiplicities().values().all(|&m| m == 1));
/// ```
#[derive(Debug, Clone)]
pub struct Sampler {
    config: SelectionConfig,
    pool: Vec<usize>,
}

impl Sampler {
    #[must_use]
    pub fn new(config: SelectionConfig) -> Self {
        let pool = match config.regime() {
            SamplingRegime::WithoutReplacement => (0..config.population_size()).collect(),
            SamplingRegime::WithReplacement => Vec::new(),
        };
        Self { config, pool }
    }

    #[must_use]
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    /// Draws one sample and returns its indices and special count.
    pub fn draw<R>(&mut self, rng: &mut R) -> DrawResult
    where
        R: Rng + ?Sized,
    {
        let population = *self.config.population();
        let indices = match self.config.regime() {
            SamplingRegime::WithoutReplacement => self.shuffle_prefix(rng).to_vec(),
            SamplingRegime::WithReplacement => (0..self.config.sample_size())
                .map(|_| rng.random_range(0..population.size()))
                .collect(),
        };
        let special_count = indices.iter().filter(|&&i| population.is_special(i)).count();
        DrawResult {
            indices,
            special_count,
        }
    }

    /// Draws one sample and returns only its special count.
    ///
    /// Consumes exactly the same random numbers as [`Self::draw`], so the two can be mixed
    /// without changing the sequence of outcomes.
    pub fn draw_special_count<R>(&mut self, rng: &mut R) -> usize
    where
        R: Rng + ?Sized,
    {
        let population = *self.config.population();
        match self.config.regime() {
            SamplingRegime::WithoutReplacement => self
                .shuffle_prefix(rng)
                .iter()
                .filter(|&&i| population.is_special(i))
                .count(),
            SamplingRegime::WithReplacement => (0..self.config.sample_size())
                .filter(|_| population.is_special(rng.random_range(0..population.size())))
                .count(),
        }
    }

    /// Runs `count` trials into `histogram`. See [`draw_many`].
    pub fn draw_many<R>(
        &mut self,
        rng: &mut R,
        count: u64,
        method: DrawMethod,
        histogram: &mut SimulationHistogram,
    ) -> Result<Option<DrawResult>, SimulationError>
    where
        R: Rng + ?Sized,
    {
        if histogram.max_k() != self.config.max_k() {
            return Err(SimulationError::HistogramMismatch {
                expected: self.config.max_k(),
                actual: histogram.max_k(),
            });
        }
        let Some(bulk) = count.checked_sub(1) else {
            return Ok(None);
        };

        match method {
            DrawMethod::Indexed => {
                for _ in 0..bulk {
                    histogram.record(self.draw_special_count(rng));
                }
            }
            DrawMethod::Direct => {
                let law = DirectLaw::new(&self.config)?;
                for _ in 0..bulk {
                    histogram.record(law.sample(rng)?);
                }
            }
        }
        let last = self.draw(rng);
        histogram.record(last.special_count());
        Ok(Some(last))
    }

    fn shuffle_prefix<R>(&mut self, rng: &mut R) -> &[usize]
    where
        R: Rng + ?Sized,
    {
        let population = self.pool.len();
        let sample = self.config.sample_size();
        for i in 0..sample {
            let j = rng.random_range(i..population);
            self.pool.swap(i, j);
        }
        &self.pool[..sample]
    }
}

enum DirectLaw {
    Hypergeometric(Hypergeometric),
    Binomial(Binomial),
}

impl DirectLaw {
    fn new(config: &SelectionConfig) -> Result<Self, SimulationError> {
        let to_u64 = |value: usize| u64::try_from(value).map_err(sampler_error);
        let law = match config.regime() {
            SamplingRegime::WithoutReplacement => Self::Hypergeometric(
                Hypergeometric::new(
                    to_u64(config.population_size())?,
                    to_u64(config.special_count())?,
                    to_u64(config.sample_size())?,
                )
                .map_err(sampler_error)?,
            ),
            SamplingRegime::WithReplacement => Self::Binomial(
                Binomial::new(
                    to_u64(config.sample_size())?,
                    config.population().special_fraction(),
                )
                .map_err(sampler_error)?,
            ),
        };
        Ok(law)
    }

    fn sample<R>(&self, rng: &mut R) -> Result<usize, SimulationError>
    where
        R: Rng + ?Sized,
    {
        let k = match self {
            Self::Hypergeometric(law) => law.sample(rng),
            Self::Binomial(law) => law.sample(rng),
        };
        usize::try_from(k).map_err(sampler_error)
    }
}

fn sampler_error<E>(err: E) -> SimulationError
where
    E: fmt::Display,
{
    SimulationError::Sampler {
        reason: err.to_string(),
    }
}

/// Draws a single sample for `config`.
pub fn draw_once<R>(config: &SelectionConfig, rng: &mut R) -> DrawResult
where
    R: Rng + ?Sized,
{
    Sampler::new(*config).draw(rng)
}

/// Runs `count` independent trials and adds their special counts to `histogram`.
///
/// Only the final trial's [`DrawResult`] is kept and returned; it is `None` when `count` is
/// zero. Counts already in `histogram` are preserved, so calling this twice with `a` and `b`
/// trials accumulates `a + b` trials.
///
/// # Example
///
/// ```
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
/// use selprob_engine::{
///     DrawMethod, SamplingRegime, SelectionConfig, SimulationHistogram, draw_many,
/// };
///
/// let config = SelectionConfig::new(120, 8, 20, SamplingRegime::WithoutReplacement).unwrap();
/// let mut histogram = SimulationHistogram::for_config(&config);
/// let mut rng = Pcg32::seed_from_u64(42);
///
/// draw_many(&config, &mut rng, 1000, DrawMethod::Indexed, &mut histogram).unwrap();
/// draw_many(&config, &mut rng, 500, DrawMethod::Indexed, &mut histogram).unwrap();
/// assert_eq!(histogram.total_draws(), 1500);
/// ```
pub fn draw_many<R>(
    config: &SelectionConfig,
    rng: &mut R,
    count: u64,
    method: DrawMethod,
    histogram: &mut SimulationHistogram,
) -> Result<Option<DrawResult>, SimulationError>
where
    R: Rng + ?Sized,
{
    Sampler::new(*config).draw_many(rng, count, method, histogram)
}
