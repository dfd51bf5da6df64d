use rand::Rng as _;
use rand_pcg::Pcg32;

use crate::{
    config::SelectionConfig,
    distribution::{Advisory, Approximation, Distribution, DistributionError},
    query::Query,
    simulation::{
        DrawMethod, DrawResult, Sampler, SimulationError, SimulationHistogram, SimulationSeed,
    },
    summary::{DistributionTable, Summary, distribution_table, summarize},
};

/// One configuration together with its distribution and accumulated simulation evidence.
///
/// The histogram only changes through [`Self::draw_once`], [`Self::draw_many`] and
/// [`Self::clear`], and is reset when [`Self::reconfigure`] switches to a different
/// configuration. Reads never touch it.
///
/// # Example
///
/// ```
/// use selprob_engine::{
///     Query, SamplingRegime, SelectionConfig, SelectionSession, SimulationSeed,
/// };
///
/// let config = SelectionConfig::new(120, 8, 20, SamplingRegime::WithoutReplacement).unwrap();
/// let seed = SimulationSeed::from_bytes([42; 16]);
/// let mut session = SelectionSession::with_seed(config, seed).unwrap();
///
/// session.draw_many(2000).unwrap();
/// session.draw_many(2000).unwrap();
///
/// let summary = session.summarize(Query::ExactlyK { k: 2 });
/// assert_eq!(summary.total_draws, 4000);
/// assert!((summary.empirical_p.unwrap() - summary.theoretical_p).abs() < 0.03);
/// ```
#[derive(Debug, Clone)]
pub struct SelectionSession {
    config: SelectionConfig,
    approximation: Approximation,
    method: DrawMethod,
    distribution: Distribution,
    histogram: SimulationHistogram,
    sampler: Sampler,
    last_draw: Option<DrawResult>,
    seed: SimulationSeed,
    rng: Pcg32,
}

impl SelectionSession {
    /// Creates a session with a random seed.
    ///
    /// For reproducible simulations, use [`Self::with_seed`] instead.
    pub fn new(config: SelectionConfig) -> Result<Self, DistributionError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic simulation.
    pub fn with_seed(
        config: SelectionConfig,
        seed: SimulationSeed,
    ) -> Result<Self, DistributionError> {
        let approximation = Approximation::default();
        Ok(Self {
            config,
            approximation,
            method: DrawMethod::default(),
            distribution: Distribution::with_model(&config, approximation)?,
            histogram: SimulationHistogram::for_config(&config),
            sampler: Sampler::new(config),
            last_draw: None,
            seed,
            rng: seed.rng(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &SelectionConfig {
        &self.config
    }

    #[must_use]
    pub const fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    #[must_use]
    pub const fn histogram(&self) -> &SimulationHistogram {
        &self.histogram
    }

    /// The most recent sample, kept for display.
    #[must_use]
    pub const fn last_draw(&self) -> Option<&DrawResult> {
        self.last_draw.as_ref()
    }

    #[must_use]
    pub const fn seed(&self) -> SimulationSeed {
        self.seed
    }

    #[must_use]
    pub const fn approximation(&self) -> Approximation {
        self.approximation
    }

    #[must_use]
    pub const fn draw_method(&self) -> DrawMethod {
        self.method
    }

    /// Switches to a new configuration.
    ///
    /// Recomputes the distribution and starts a fresh histogram. On error the session is
    /// left unchanged. Reapplying the current configuration keeps the accumulated counts.
    pub fn reconfigure(&mut self, config: SelectionConfig) -> Result<(), DistributionError> {
        if config == self.config {
            return Ok(());
        }
        let distribution = Distribution::with_model(&config, self.approximation)?;
        self.config = config;
        self.distribution = distribution;
        self.histogram = SimulationHistogram::for_config(&config);
        self.sampler = Sampler::new(config);
        self.last_draw = None;
        Ok(())
    }

    /// Recomputes the distribution with another model.
    ///
    /// The simulated counts do not depend on the model and are kept.
    pub fn set_approximation(&mut self, model: Approximation) -> Result<(), DistributionError> {
        self.distribution = Distribution::with_model(&self.config, model)?;
        self.approximation = model;
        Ok(())
    }

    pub const fn set_draw_method(&mut self, method: DrawMethod) {
        self.method = method;
    }

    /// Draws a single sample and records it.
    pub fn draw_once(&mut self) -> &DrawResult {
        let draw = self.sampler.draw(&mut self.rng);
        self.histogram.record(draw.special_count());
        self.last_draw.insert(draw)
    }

    /// Draws `count` samples and adds them to the accumulated counts.
    pub fn draw_many(&mut self, count: u64) -> Result<Option<&DrawResult>, SimulationError> {
        let last = self
            .sampler
            .draw_many(&mut self.rng, count, self.method, &mut self.histogram)?;
        if let Some(last) = last {
            self.last_draw = Some(last);
        }
        Ok(self.last_draw.as_ref())
    }

    /// Discards every simulated sample.
    pub fn clear(&mut self) {
        self.histogram.clear();
        self.last_draw = None;
    }

    #[must_use]
    pub fn summarize(&self, query: Query) -> Summary {
        summarize(&self.distribution, &self.histogram, query)
    }

    #[must_use]
    pub fn table(&self) -> DistributionTable {
        distribution_table(&self.distribution, &self.histogram)
    }

    #[must_use]
    pub fn advisories(&self) -> Vec<Advisory> {
        self.distribution.advisories()
    }
}
