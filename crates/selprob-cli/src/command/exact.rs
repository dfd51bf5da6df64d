use std::path::PathBuf;

use anyhow::Context;
use selprob_engine::{Distribution, SimulationHistogram, distribution_table, summarize};

use crate::{
    command::selection::{self, SelectionArg},
    schema::{
        report::{ExactReport, Quartiles},
        scenario_file::ScenarioFile,
    },
    util::Output,
};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ExactArg {
    #[command(flatten)]
    selection: SelectionArg,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ExactArg) -> anyhow::Result<()> {
    let ExactArg { selection, output } = arg;
    let settings = selection.resolve(ScenarioFile::default())?;
    settings.print_header();

    let distribution = Distribution::with_model(&settings.config, settings.approximation)
        .context("Failed to compute the distribution")?;
    let histogram = SimulationHistogram::for_config(&settings.config);
    let summary = summarize(&distribution, &histogram, settings.query);
    let table = distribution_table(&distribution, &histogram);

    selection::print_table(&table);
    selection::print_summary(&summary);
    let advisories = distribution.advisories();
    for advisory in &advisories {
        eprintln!("Warning: {advisory}");
    }

    let report = ExactReport {
        info: settings.run_info(),
        summary,
        moments: distribution.moments().into(),
        quartiles: Quartiles::of(&distribution),
        advisories,
        table,
    };
    let output = Output::new(output.clone());
    output.write_json(&report)?;
    eprintln!("Report written to {}", output.describe());
    Ok(())
}
