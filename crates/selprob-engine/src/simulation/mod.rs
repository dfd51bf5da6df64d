//! Monte Carlo resampling of a [`SelectionConfig`](crate::SelectionConfig).
//!
//! - [`Sampler`] - Draws uniformly random samples under either sampling regime
//! - [`SimulationHistogram`] - Additive accumulator of simulated special counts
//! - [`SimulationSeed`] - Seed for deterministic simulation
//! - [`draw_once`] / [`draw_many`] - Single draws and batches on an injected generator
//! - [`simulate_parallel`] - Batches split across worker threads
//!
//! Every operation takes its random generator (or seed) explicitly; nothing draws from
//! global state, so any run can be replayed from its seed.

pub use self::{draw::*, histogram::*, parallel::*, seed::*};

mod draw;
mod histogram;
mod parallel;
mod seed;

/// Failure while simulating.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SimulationError {
    #[display("histogram covers 0..={actual} but the configuration needs 0..={expected}")]
    HistogramMismatch { expected: usize, actual: usize },
    #[display("cannot build direct sampler: {reason}")]
    Sampler { reason: String },
}
