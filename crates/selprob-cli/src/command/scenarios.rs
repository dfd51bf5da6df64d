use std::path::PathBuf;

use selprob_engine::{Distribution, SCENARIOS};

use crate::{schema::report::ScenarioListing, util::Output};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct ScenariosArg {
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &ScenariosArg) -> anyhow::Result<()> {
    let ScenariosArg { output } = arg;
    let mut listings = Vec::with_capacity(SCENARIOS.len());
    for scenario in &SCENARIOS {
        let config = scenario.config()?;
        let distribution = Distribution::exact(&config)?;
        let theoretical_p = scenario.query.probability(&distribution);
        eprintln!("{:<16} {}", scenario.id, scenario.label);
        eprintln!(
            "{:<16} {config}, item {}, {} -> P = {theoretical_p:.4}",
            "", scenario.special_label, scenario.query
        );
        listings.push(ScenarioListing {
            scenario: *scenario,
            theoretical_p,
        });
    }
    Output::new(output.clone()).write_json(&listings)
}
