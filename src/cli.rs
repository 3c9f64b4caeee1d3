mod config;
mod fetch;
mod report;
mod summarize;

use clap::{Parser, Subcommand};

use crate::{
    cli::{fetch::FetchArgs, report::ReportArgs, summarize::SummarizeArgs},
    prelude::*,
};

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
#[must_use]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Main command: fetch both reports, then aggregate and summarise them.
    #[clap(name = "report")]
    Report(Box<ReportArgs>),

    /// Fetch both reports and save them as CSV.
    #[clap(name = "fetch")]
    Fetch(Box<FetchArgs>),

    /// Aggregate and summarise the previously fetched reports.
    #[clap(name = "summarize")]
    Summarize(Box<SummarizeArgs>),
}

impl Command {
    pub async fn run(self) -> Result {
        match self {
            Self::Report(args) => args.run().await,
            Self::Fetch(args) => args.run().await,
            Self::Summarize(args) => args.run(),
        }
    }
}
