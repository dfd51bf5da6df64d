use chrono::{DateTime, Utc};
use selprob_engine::{
    Advisory, Approximation, Distribution, DistributionTable, DrawMethod, DrawResult, Scenario,
    SelectionConfig, SimulationHistogram, SimulationSeed, Summary,
};
use selprob_stats::moments::Moments;
use serde::Serialize;

/// Header shared by every report.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct RunInfo {
    /// Timestamp when the report was generated (ISO 8601 format)
    pub generated_at: DateTime<Utc>,
    /// Preset the run started from, if any
    pub scenario: Option<String>,
    /// Predicate describing the special items
    pub special_label: Option<String>,
    pub config: SelectionConfig,
    pub approximation: Approximation,
}

/// Output of `selprob exact`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ExactReport {
    #[serde(flatten)]
    pub info: RunInfo,
    pub summary: Summary,
    pub moments: MomentsReport,
    pub quartiles: Quartiles,
    pub advisories: Vec<Advisory>,
    pub table: DistributionTable,
}

/// Output of `selprob simulate`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SimulationReport {
    #[serde(flatten)]
    pub info: RunInfo,
    /// Seed that reproduces this run
    pub seed: SimulationSeed,
    pub method: DrawMethod,
    pub threads: usize,
    pub summary: Summary,
    pub theoretical_moments: MomentsReport,
    /// `None` when no trial ran
    pub empirical_moments: Option<MomentsReport>,
    pub histogram: SimulationHistogram,
    /// Final simulated sample
    pub last_draw: Option<DrawResult>,
    pub advisories: Vec<Advisory>,
    pub table: DistributionTable,
}

/// One entry of `selprob scenarios`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ScenarioListing {
    #[serde(flatten)]
    pub scenario: Scenario,
    /// The preset's query evaluated on the exact distribution
    pub theoretical_p: f64,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MomentsReport {
    pub mean: f64,
    pub variance: f64,
    pub std_dev: f64,
    pub skewness: f64,
    pub shape: String,
}

impl From<Moments> for MomentsReport {
    fn from(moments: Moments) -> Self {
        Self {
            mean: moments.mean,
            variance: moments.variance,
            std_dev: moments.std_dev,
            skewness: moments.skewness,
            shape: moments.shape().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize)]
pub(crate) struct Quartiles {
    pub lower: usize,
    pub median: usize,
    pub upper: usize,
}

impl Quartiles {
    pub(crate) fn of(distribution: &Distribution) -> Self {
        Self {
            lower: distribution.quantile(0.25),
            median: distribution.quantile(0.5),
            upper: distribution.quantile(0.75),
        }
    }
}
