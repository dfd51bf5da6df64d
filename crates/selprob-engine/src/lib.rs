//! Selection-probability engine.
//!
//! Answers the question "if I draw `n` items from a population of `N`, of which `r` are
//! special, how many special items `K` end up in my sample?" both exactly and by Monte Carlo
//! resampling, and compares the two.
//!
//! - [`SelectionConfig`] - Validated population and sample parameters
//! - [`Distribution`] - Exact (hypergeometric or binomial) or approximate PMF of `K`
//! - [`Query`] - Questions such as "exactly k" or "at least one"
//! - [`simulation`] - Samplers, histograms, seeds and parallel batches
//! - [`Summary`] / [`DistributionTable`] - Theoretical and empirical answers side by side
//! - [`SelectionSession`] - One configuration with its accumulated simulation evidence
//! - [`Scenario`] - Built-in case studies
//!
//! # Example
//!
//! ```
//! use rand::SeedableRng as _;
//! use rand_pcg::Pcg32;
//! use selprob_engine::{
//!     DrawMethod, Query, SamplingRegime, SimulationHistogram, draw_many, exact_distribution,
//!     summarize,
//! };
//!
//! // 200 customers, 10 of them VIPs; survey 40 without replacement.
//! let distribution =
//!     exact_distribution(200, 10, 40, SamplingRegime::WithoutReplacement).unwrap();
//! let p = distribution.evaluate(Query::AtLeastOne);
//! assert!((p - 0.8987).abs() < 1e-4);
//!
//! let config = *distribution.config();
//! let mut histogram = SimulationHistogram::for_config(&config);
//! let mut rng = Pcg32::seed_from_u64(1);
//! draw_many(&config, &mut rng, 5000, DrawMethod::Indexed, &mut histogram).unwrap();
//!
//! let summary = summarize(&distribution, &histogram, Query::AtLeastOne);
//! assert!(summary.discrepancy().unwrap() < 0.02);
//! ```

pub use self::{
    config::*, distribution::*, query::*, scenario::*, session::*, simulation::*, summary::*,
};

pub mod config;
pub mod distribution;
pub mod query;
pub mod scenario;
pub mod session;
pub mod simulation;
pub mod summary;
