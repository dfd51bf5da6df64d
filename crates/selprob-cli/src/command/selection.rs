use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use selprob_engine::{
    Approximation, DistributionTable, Query, SamplingRegime, Scenario, SelectionConfig,
    SimulationSeed, Summary,
};

use crate::{schema::report::RunInfo, schema::scenario_file::ScenarioFile, util::read_json_file};

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::FromStr)]
pub(crate) enum RegimeArg {
    Without,
    With,
}

impl From<RegimeArg> for SamplingRegime {
    fn from(arg: RegimeArg) -> Self {
        match arg {
            RegimeArg::Without => Self::WithoutReplacement,
            RegimeArg::With => Self::WithReplacement,
        }
    }
}

/// Population, sample and query options shared by `exact` and `simulate`.
///
/// Values are taken from the built-in defaults, then `--scenario`, then `--config`, then the
/// individual flags; later sources win.
#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SelectionArg {
    /// Start from a built-in scenario (see `selprob scenarios`)
    #[arg(long)]
    scenario: Option<String>,
    /// Read settings from a JSON scenario file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Population size N [default: 100]
    #[arg(short = 'N', long)]
    population: Option<usize>,
    /// Number of special items r in the population [default: 5]
    #[arg(short = 'r', long)]
    special: Option<usize>,
    /// Sample size n [default: 20]
    #[arg(short = 'n', long)]
    sample: Option<usize>,
    /// Sampling regime: `without` or `with` replacement [default: without]
    #[arg(long)]
    regime: Option<RegimeArg>,
    /// Model n independent trials with this success probability instead of a population
    /// (ignores -N, -r and --regime)
    #[arg(short = 'p', long)]
    probability: Option<f64>,
    /// Query: exactly:K, at-least-one, at-least:K, at-most:K or between:LO:HI
    /// [default: at-least-one]
    #[arg(long)]
    query: Option<Query>,
    /// Model for the theoretical distribution: exact, normal or poisson [default: exact]
    #[arg(long)]
    approximation: Option<Approximation>,
    /// What makes an item special, used in the printed summary
    #[arg(long)]
    label: Option<String>,
}

/// Fully resolved run settings.
#[derive(Debug, Clone)]
pub(crate) struct Settings {
    pub scenario: Option<String>,
    pub special_label: Option<String>,
    pub config: SelectionConfig,
    pub query: Query,
    pub approximation: Approximation,
    pub simulations: u64,
    pub seed: Option<SimulationSeed>,
}

impl SelectionArg {
    fn flags(&self) -> ScenarioFile {
        ScenarioFile {
            scenario: self.scenario.clone(),
            population_size: self.population,
            special_count: self.special,
            sample_size: self.sample,
            regime: self.regime.map(SamplingRegime::from),
            trial_probability: self.probability,
            query: self.query,
            approximation: self.approximation,
            simulations: None,
            seed: None,
            special_label: self.label.clone(),
        }
    }

    /// Resolves the settings, with `extra` (subcommand-specific flags) applied last.
    pub(crate) fn resolve(&self, extra: ScenarioFile) -> anyhow::Result<Settings> {
        let file = self
            .config
            .as_ref()
            .map(|path| read_json_file::<ScenarioFile, _>("scenario", path))
            .transpose()?;

        let preset_id = self
            .scenario
            .as_deref()
            .or_else(|| file.as_ref().and_then(|f| f.scenario.as_deref()));
        let mut layer = ScenarioFile::defaults();
        if let Some(id) = preset_id {
            layer = layer.overlay(ScenarioFile::from_scenario(Scenario::find(id)?));
        }
        if let Some(file) = file {
            layer = layer.overlay(file);
        }
        Settings::from_layer(layer.overlay(self.flags()).overlay(extra))
    }
}

impl Settings {
    fn from_layer(layer: ScenarioFile) -> anyhow::Result<Self> {
        let missing = |name: &str| format!("no value for {name}");
        let sample_size = layer.sample_size.with_context(|| missing("sample size"))?;
        let config = match layer.trial_probability {
            Some(probability) => SelectionConfig::bernoulli_trials(sample_size, probability)
                .context("Invalid trial settings")?,
            None => SelectionConfig::new(
                layer.population_size.with_context(|| missing("population size"))?,
                layer.special_count.with_context(|| missing("special count"))?,
                sample_size,
                layer.regime.unwrap_or_default(),
            )
            .context("Invalid population or sample")?,
        };
        Ok(Self {
            scenario: layer.scenario,
            special_label: layer.special_label,
            config,
            query: layer.query.unwrap_or(Query::AtLeastOne),
            approximation: layer.approximation.unwrap_or_default(),
            simulations: layer.simulations.with_context(|| missing("simulations"))?,
            seed: layer.seed,
        })
    }

    pub(crate) fn run_info(&self) -> RunInfo {
        RunInfo {
            generated_at: Utc::now(),
            scenario: self.scenario.clone(),
            special_label: self.special_label.clone(),
            config: self.config,
            approximation: self.approximation,
        }
    }

    pub(crate) fn print_header(&self) {
        if let Some(scenario) = self
            .scenario
            .as_deref()
            .and_then(|id| Scenario::find(id).ok())
        {
            eprintln!("Scenario: {} ({})", scenario.label, scenario.id);
        }
        eprintln!("Configuration: {}", self.config);
        if let Some(label) = &self.special_label {
            eprintln!("Special item: {label}");
        }
        eprintln!(
            "Model: {}, support K = 0..={}",
            self.approximation,
            self.config.max_k()
        );
    }
}

pub(crate) fn print_summary(summary: &Summary) {
    eprintln!("Query {}:", summary.query);
    eprintln!("  theoretical P = {:.6}", summary.theoretical_p);
    match summary.empirical_p {
        Some(p) => eprintln!(
            "  empirical P   = {p:.6} over {} samples (difference {:.6})",
            summary.total_draws,
            (p - summary.theoretical_p).abs()
        ),
        None => eprintln!("  empirical P   = not available (no simulation yet)"),
    }
    eprintln!("  E[K] = {:.4}", summary.expected_k);
    if let Some(mean) = summary.empirical_mean {
        eprintln!("  simulated mean K = {mean:.4}");
    }
    if let Some(k) = summary.query.target_k() {
        eprintln!("  P(K <= {k}) = {:.6}", summary.cumulative_p(k));
    }
}

pub(crate) fn print_table(table: &DistributionTable) {
    eprintln!("{:>5}  {:>10}  {:>10}  {:>10}", "k", "P(K=k)", "simulated", "P(K<=k)");
    for row in &table.rows {
        let empirical = row
            .empirical
            .map_or_else(|| "-".to_owned(), |p| format!("{p:.6}"));
        eprintln!(
            "{:>5}  {:>10.6}  {:>10}  {:>10.6}",
            row.k, row.exact, empirical, row.cumulative
        );
    }
    if let Some(row) = table.example_row() {
        eprintln!(
            "Most likely: K = {} with probability {:.6}",
            row.k, row.exact
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SelectionArg::default()
            .resolve(ScenarioFile::default())
            .unwrap();
        assert_eq!(
            settings.config,
            SelectionConfig::new(100, 5, 20, SamplingRegime::WithoutReplacement).unwrap()
        );
        assert_eq!(settings.query, Query::AtLeastOne);
        assert_eq!(settings.simulations, 2000);
        assert_eq!(settings.scenario, None);
    }

    #[test]
    fn test_flags_override_scenario() {
        let arg = SelectionArg {
            scenario: Some("qc-defects".to_owned()),
            sample: Some(30),
            regime: Some(RegimeArg::With),
            ..SelectionArg::default()
        };
        let settings = arg.resolve(ScenarioFile::default()).unwrap();
        assert_eq!(settings.config.population_size(), 120);
        assert_eq!(settings.config.special_count(), 8);
        assert_eq!(settings.config.sample_size(), 30);
        assert_eq!(settings.config.regime(), SamplingRegime::WithReplacement);
        assert_eq!(settings.query, Query::ExactlyK { k: 2 });
        assert_eq!(settings.simulations, 4000);
    }

    #[test]
    fn test_extra_layer_wins() {
        let extra = ScenarioFile {
            simulations: Some(10),
            ..ScenarioFile::default()
        };
        let settings = SelectionArg::default().resolve(extra).unwrap();
        assert_eq!(settings.simulations, 10);
    }

    #[test]
    fn test_invalid_combination_is_reported() {
        let arg = SelectionArg {
            population: Some(10),
            sample: Some(11),
            ..SelectionArg::default()
        };
        let err = arg.resolve(ScenarioFile::default()).unwrap_err();
        assert!(format!("{err:#}").contains("cannot exceed population size"));
    }

    #[test]
    fn test_unknown_scenario() {
        let arg = SelectionArg {
            scenario: Some("lottery".to_owned()),
            ..SelectionArg::default()
        };
        let err = arg.resolve(ScenarioFile::default()).unwrap_err();
        assert!(err.to_string().contains("unknown scenario"));
    }

    #[test]
    fn test_trial_probability_replaces_population() {
        let arg = SelectionArg {
            scenario: Some("vip-panel".to_owned()),
            sample: Some(12),
            probability: Some(0.37),
            ..SelectionArg::default()
        };
        let settings = arg.resolve(ScenarioFile::default()).unwrap();
        assert_eq!(
            settings.config,
            SelectionConfig::bernoulli_trials(12, 0.37).unwrap()
        );
        assert_eq!(settings.config.regime(), SamplingRegime::WithReplacement);
    }

    #[test]
    fn test_invalid_trial_probability_is_reported() {
        let arg = SelectionArg {
            probability: Some(1.5),
            ..SelectionArg::default()
        };
        let err = arg.resolve(ScenarioFile::default()).unwrap_err();
        assert!(format!("{err:#}").contains("must lie in [0, 1]"));
    }

    #[test]
    fn test_regime_arg_parsing() {
        assert_eq!("with".parse::<RegimeArg>().unwrap(), RegimeArg::With);
        assert_eq!("without".parse::<RegimeArg>().unwrap(), RegimeArg::Without);
    }
}
