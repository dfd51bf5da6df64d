use selprob_engine::{Approximation, Query, SamplingRegime, Scenario, SimulationSeed};
use serde::{Deserialize, Serialize};

/// Partial run settings, as read from a `--config` JSON file.
///
/// Every field is optional. Layers are stacked with [`Self::overlay`]: built-in defaults,
/// then a preset, then the file, then command-line flags.
///
/// ```json
/// {
///   "scenario": "qc-defects",
///   "sample_size": 30,
///   "query": { "mode": "at_least", "k": 2 },
///   "seed": "0123456789abcdeffedcba9876543210"
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct ScenarioFile {
    /// Id of a built-in preset the remaining fields refine.
    pub scenario: Option<String>,
    pub population_size: Option<usize>,
    pub special_count: Option<usize>,
    pub sample_size: Option<usize>,
    pub regime: Option<SamplingRegime>,
    /// Success probability of independent trials; replaces the population when set.
    pub trial_probability: Option<f64>,
    pub query: Option<Query>,
    pub approximation: Option<Approximation>,
    pub simulations: Option<u64>,
    pub seed: Option<SimulationSeed>,
    pub special_label: Option<String>,
}

impl ScenarioFile {
    /// Settings used when nothing else is given: 5 special items among 100, sample of 20.
    pub(crate) fn defaults() -> Self {
        Self {
            scenario: None,
            population_size: Some(100),
            special_count: Some(5),
            sample_size: Some(20),
            regime: Some(SamplingRegime::WithoutReplacement),
            trial_probability: None,
            query: Some(Query::AtLeastOne),
            approximation: Some(Approximation::Exact),
            simulations: Some(2000),
            seed: None,
            special_label: None,
        }
    }

    pub(crate) fn from_scenario(scenario: &Scenario) -> Self {
        Self {
            scenario: Some(scenario.id.to_owned()),
            population_size: Some(scenario.population_size),
            special_count: Some(scenario.special_count),
            sample_size: Some(scenario.sample_size),
            regime: Some(scenario.regime),
            trial_probability: None,
            query: Some(scenario.query),
            approximation: None,
            simulations: Some(scenario.simulations),
            seed: None,
            special_label: Some(scenario.special_label.to_owned()),
        }
    }

    /// Returns `self` with every field set in `top` replaced by `top`'s value.
    #[must_use]
    pub(crate) fn overlay(self, top: Self) -> Self {
        Self {
            scenario: top.scenario.or(self.scenario),
            population_size: top.population_size.or(self.population_size),
            special_count: top.special_count.or(self.special_count),
            sample_size: top.sample_size.or(self.sample_size),
            regime: top.regime.or(self.regime),
            trial_probability: top.trial_probability.or(self.trial_probability),
            query: top.query.or(self.query),
            approximation: top.approximation.or(self.approximation),
            simulations: top.simulations.or(self.simulations),
            seed: top.seed.or(self.seed),
            special_label: top.special_label.or(self.special_label),
        }
    }
}
