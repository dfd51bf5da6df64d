use std::{num::NonZeroUsize, path::PathBuf, time::Instant};

use anyhow::Context;
use rand::Rng as _;
use selprob_engine::{
    Distribution, DrawMethod, SelectionSession, SimulationSeed, distribution_table,
    simulate_parallel, summarize,
};

use crate::{
    command::selection::{self, SelectionArg},
    schema::{report::SimulationReport, scenario_file::ScenarioFile},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    #[command(flatten)]
    selection: SelectionArg,
    /// Number of simulated samples [default: 2000, or the scenario's count]
    #[arg(long)]
    trials: Option<u64>,
    /// Seed as 32 hex digits; random when omitted
    #[arg(long)]
    seed: Option<SimulationSeed>,
    /// How each trial is produced: indexed (draw items) or direct (sample K)
    #[arg(long, default_value_t = DrawMethod::Indexed)]
    method: DrawMethod,
    /// Number of worker threads
    #[arg(long, default_value_t = NonZeroUsize::MIN)]
    threads: NonZeroUsize,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SimulateArg) -> anyhow::Result<()> {
    let SimulateArg {
        selection,
        trials,
        seed,
        method,
        threads,
        output,
    } = arg;
    let settings = selection.resolve(ScenarioFile {
        simulations: *trials,
        seed: *seed,
        ..ScenarioFile::default()
    })?;
    settings.print_header();

    let seed = settings.seed.unwrap_or_else(|| rand::rng().random());
    eprintln!(
        "Simulating {} samples ({method}, {threads} thread(s), seed {seed})...",
        settings.simulations
    );
    let start = Instant::now();

    let (distribution, histogram, last_draw) = if threads.get() == 1 {
        let mut session = SelectionSession::with_seed(settings.config, seed)
            .context("Failed to compute the distribution")?;
        session
            .set_approximation(settings.approximation)
            .context("Failed to compute the distribution")?;
        session.set_draw_method(*method);
        session.draw_many(settings.simulations)?;
        (
            session.distribution().clone(),
            session.histogram().clone(),
            session.last_draw().cloned(),
        )
    } else {
        let distribution = Distribution::with_model(&settings.config, settings.approximation)
            .context("Failed to compute the distribution")?;
        let run = simulate_parallel(
            &settings.config,
            seed,
            settings.simulations,
            *threads,
            *method,
        )?;
        (distribution, run.histogram, run.last_draw)
    };
    eprintln!("Simulation finished in {:.2?}", start.elapsed());

    let summary = summarize(&distribution, &histogram, settings.query);
    let table = distribution_table(&distribution, &histogram);
    selection::print_table(&table);
    selection::print_summary(&summary);
    if let Some(draw) = &last_draw {
        eprintln!(
            "Last sample: {} of {} drawn items special, indices {:?}",
            draw.special_count(),
            draw.sample_size(),
            draw.indices()
        );
    }
    let advisories = distribution.advisories();
    for advisory in &advisories {
        eprintln!("Warning: {advisory}");
    }

    let report = SimulationReport {
        info: settings.run_info(),
        seed,
        method: *method,
        threads: threads.get(),
        summary,
        theoretical_moments: distribution.moments().into(),
        empirical_moments: histogram.moments().map(Into::into),
        histogram,
        last_draw,
        advisories,
        table,
    };
    let output = Output::new(output.clone());
    output.write_json(&report)?;
    eprintln!("Report written to {}", output.describe());
    Ok(())
}
