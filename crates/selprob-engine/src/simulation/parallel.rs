use std::{num::NonZeroUsize, panic, thread};

use crate::config::SelectionConfig;

use super::{
    DrawMethod, DrawResult, SimulationError, SimulationHistogram, SimulationSeed, draw_many,
};

/// Outcome of [`simulate_parallel`].
#[derive(Debug, Clone)]
pub struct ParallelSimulation {
    /// Element-wise sum of all worker histograms.
    pub histogram: SimulationHistogram,
    /// Final draw of the worker that ran last in index order, if any trial ran.
    pub last_draw: Option<DrawResult>,
}

/// Runs `trials` trials split across `workers` threads.
///
/// Each worker draws from its own generator ([`SimulationSeed::worker_rng`]) into a local
/// histogram; the local histograms are merged by element-wise addition once every worker has
/// finished. Results depend on the seed and the worker count, never on thread scheduling.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use selprob_engine::{
///     DrawMethod, SamplingRegime, SelectionConfig, SimulationSeed, simulate_parallel,
/// };
///
/// let config = SelectionConfig::new(120, 8, 20, SamplingRegime::WithoutReplacement).unwrap();
/// let seed = SimulationSeed::from_bytes([7; 16]);
/// let workers = NonZeroUsize::new(4).unwrap();
///
/// let run = simulate_parallel(&config, seed, 10_000, workers, DrawMethod::Indexed).unwrap();
/// assert_eq!(run.histogram.total_draws(), 10_000);
/// ```
pub fn simulate_parallel(
    config: &SelectionConfig,
    seed: SimulationSeed,
    trials: u64,
    workers: NonZeroUsize,
    method: DrawMethod,
) -> Result<ParallelSimulation, SimulationError> {
    let shares = split_trials(trials, workers);

    let results = thread::scope(|s| {
        let handles = shares
            .iter()
            .enumerate()
            .map(|(index, &share)| {
                s.spawn(move || -> Result<_, SimulationError> {
                    let mut rng = seed.worker_rng(index);
                    let mut histogram = SimulationHistogram::for_config(config);
                    let last = draw_many(config, &mut rng, share, method, &mut histogram)?;
                    Ok((histogram, last))
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|e| panic::resume_unwind(e)))
            .collect::<Vec<_>>()
    });

    let mut histogram = SimulationHistogram::for_config(config);
    let mut last_draw = None;
    for result in results {
        let (local, last) = result?;
        histogram.merge(&local)?;
        last_draw = last.or(last_draw);
    }
    Ok(ParallelSimulation {
        histogram,
        last_draw,
    })
}

fn split_trials(trials: u64, workers: NonZeroUsize) -> Vec<u64> {
    let workers = workers.get() as u64;
    let base = trials / workers;
    let extra = trials % workers;
    (0..workers).map(|i| base + u64::from(i < extra)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::SamplingRegime, distribution::Distribution, query::Query};

    fn workers(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    #[test]
    fn test_split_trials() {
        assert_eq!(split_trials(10, workers(3)), vec![4, 3, 3]);
        assert_eq!(split_trials(2, workers(4)), vec![1, 1, 0, 0]);
        assert_eq!(split_trials(0, workers(2)), vec![0, 0]);
    }

    #[test]
    fn test_total_and_determinism() {
        let config = SelectionConfig::new(200, 10, 40, SamplingRegime::WithoutReplacement).unwrap();
        let seed = SimulationSeed::from_bytes([3; 16]);
        let a = simulate_parallel(&config, seed, 4001, workers(4), DrawMethod::Indexed).unwrap();
        let b = simulate_parallel(&config, seed, 4001, workers(4), DrawMethod::Indexed).unwrap();
        assert_eq!(a.histogram.total_draws(), 4001);
        assert_eq!(a.histogram, b.histogram);
        assert!(a.last_draw.is_some());
    }

    #[test]
    fn test_single_worker_matches_sequential() {
        let config = SelectionConfig::new(50, 5, 10, SamplingRegime::WithReplacement).unwrap();
        let seed = SimulationSeed::from_bytes([9; 16]);
        let parallel =
            simulate_parallel(&config, seed, 500, workers(1), DrawMethod::Indexed).unwrap();

        let mut rng = seed.worker_rng(0);
        let mut sequential = SimulationHistogram::for_config(&config);
        let last =
            draw_many(&config, &mut rng, 500, DrawMethod::Indexed, &mut sequential).unwrap();
        assert_eq!(parallel.histogram, sequential);
        assert_eq!(parallel.last_draw, last);
    }

    #[test]
    fn test_converges() {
        let config = SelectionConfig::new(120, 8, 20, SamplingRegime::WithoutReplacement).unwrap();
        let exact = Distribution::exact(&config).unwrap();
        let run = simulate_parallel(
            &config,
            SimulationSeed::from_bytes([1; 16]),
            20_000,
            workers(4),
            DrawMethod::Direct,
        )
        .unwrap();
        let query = Query::ExactlyK { k: 2 };
        let empirical = query.empirical_probability(&run.histogram).unwrap();
        assert!((empirical - query.probability(&exact)).abs() < 0.02);
    }

    #[test]
    fn test_zero_trials() {
        let config = SelectionConfig::new(10, 3, 4, SamplingRegime::WithoutReplacement).unwrap();
        let run = simulate_parallel(
            &config,
            SimulationSeed::from_bytes([0; 16]),
            0,
            workers(3),
            DrawMethod::Indexed,
        )
        .unwrap();
        assert!(run.histogram.is_empty());
        assert!(run.last_draw.is_none());
    }
}
