use clap::Parser;

use crate::{
    cli::{
        config::{ConfigArgs, OutputArgs},
        fetch::{fetch_reports, save_reports},
        summarize::summarize_reports,
    },
    prelude::*,
};

#[derive(Parser)]
pub struct ReportArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

impl ReportArgs {
    #[instrument(skip_all)]
    pub async fn run(self) -> Result {
        let config = self.config.load()?;
        let output_dir = self.output.create_dir()?;
        let [forecast, outturn] = fetch_reports(&config.api()?, &config).await;
        ensure!(
            !forecast.is_empty() || !outturn.is_empty(),
            "no records fetched between {} and {}",
            config.start_date,
            config.end_date,
        );
        save_reports(output_dir, &forecast, &outturn)?;
        summarize_reports(&config, &forecast, &outturn, output_dir)
    }
}
