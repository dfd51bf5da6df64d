use clap::{Parser, Subcommand};

use self::{exact::ExactArg, scenarios::ScenariosArg, simulate::SimulateArg};

mod exact;
mod scenarios;
mod selection;
mod simulate;

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    /// What to compute
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Compute the exact distribution of the special count and answer a query
    Exact(#[clap(flatten)] ExactArg),
    /// Simulate samples and compare the empirical answer with the exact one
    Simulate(#[clap(flatten)] SimulateArg),
    /// List the built-in scenarios
    Scenarios(#[clap(flatten)] ScenariosArg),
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    match args.mode {
        Mode::Exact(arg) => exact::run(&arg)?,
        Mode::Simulate(arg) => simulate::run(&arg)?,
        Mode::Scenarios(arg) => scenarios::run(&arg)?,
    }
    Ok(())
}
