//! Built-in case studies.

use serde::Serialize;

use crate::{
    config::{ConfigError, SamplingRegime, SelectionConfig},
    query::Query,
};

/// A named, ready-to-run configuration with its question of interest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Scenario {
    pub id: &'static str,
    pub label: &'static str,
    /// What makes an item special, phrased as a predicate ("is a VIP customer").
    pub special_label: &'static str,
    pub population_size: usize,
    pub sample_size: usize,
    pub special_count: usize,
    pub regime: SamplingRegime,
    pub query: Query,
    /// Suggested number of simulated samples.
    pub simulations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ScenarioError {
    #[display("unknown scenario '{id}' (available: {})", available_ids())]
    UnknownScenario { id: String },
}

fn available_ids() -> String {
    SCENARIOS.iter().map(|s| s.id).collect::<Vec<_>>().join(", ")
}

pub static SCENARIOS: [Scenario; 4] = [
    Scenario {
        id: "vip-panel",
        label: "VIP customers in a loyalty survey sample",
        special_label: "is a VIP customer",
        population_size: 200,
        sample_size: 40,
        special_count: 10,
        regime: SamplingRegime::WithoutReplacement,
        query: Query::AtLeastOne,
        simulations: 3000,
    },
    Scenario {
        id: "lead-ads",
        label: "High-value leads in a retargeting burst",
        special_label: "is a high-value prospect",
        population_size: 100,
        sample_size: 50,
        special_count: 5,
        regime: SamplingRegime::WithReplacement,
        query: Query::AtLeastOne,
        simulations: 3000,
    },
    Scenario {
        id: "qc-defects",
        label: "Quality control on a campaign asset batch",
        special_label: "has a formatting defect",
        population_size: 120,
        sample_size: 20,
        special_count: 8,
        regime: SamplingRegime::WithoutReplacement,
        query: Query::ExactlyK { k: 2 },
        simulations: 4000,
    },
    Scenario {
        id: "player-homeruns",
        label: "Projecting home runs in upcoming at-bats",
        special_label: "hits a home run",
        population_size: 200,
        sample_size: 10,
        special_count: 5,
        regime: SamplingRegime::WithReplacement,
        query: Query::ExactlyK { k: 1 },
        simulations: 4000,
    },
];

impl Scenario {
    /// Looks up a preset by id.
    ///
    /// # Example
    ///
    /// ```
    /// use selprob_engine::{Query, Scenario};
    ///
    /// let scenario = Scenario::find("qc-defects").unwrap();
    /// assert_eq!(scenario.query, Query::ExactlyK { k: 2 });
    /// assert!(Scenario::find("lottery").is_err());
    /// ```
    pub fn find(id: &str) -> Result<&'static Self, ScenarioError> {
        SCENARIOS
            .iter()
            .find(|s| s.id == id)
            .ok_or_else(|| ScenarioError::UnknownScenario { id: id.to_owned() })
    }

    pub fn config(&self) -> Result<SelectionConfig, ConfigError> {
        SelectionConfig::new(
            self.population_size,
            self.special_count,
            self.sample_size,
            self.regime,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::Distribution;

    #[test]
    fn test_presets_are_valid() {
        for scenario in &SCENARIOS {
            let config = scenario.config().unwrap();
            assert!(Distribution::exact(&config).is_ok(), "{}", scenario.id);
        }
    }

    #[test]
    fn test_ids_are_unique() {
        for (i, a) in SCENARIOS.iter().enumerate() {
            for b in &SCENARIOS[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_unknown_id_lists_available() {
        let err = Scenario::find("lottery").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("lottery"));
        assert!(message.contains("vip-panel"));
    }

    #[test]
    fn test_golden_presets() {
        let answer = |id| {
            let scenario = Scenario::find(id).unwrap();
            let distribution = Distribution::exact(&scenario.config().unwrap()).unwrap();
            scenario.query.probability(&distribution)
        };
        assert!((answer("vip-panel") - 0.898_710_594_144_443_4).abs() < 1e-10);
        assert!((answer("lead-ads") - 0.923_055_024_723_286_8).abs() < 1e-10);
        assert!((answer("qc-defects") - 0.269_546_855_612_913_5).abs() < 1e-10);
        // 10 * 0.025 * 0.975^9
        assert!((answer("player-homeruns") - 10.0 * 0.025 * 0.975_f64.powi(9)).abs() < 1e-12);
    }
}
