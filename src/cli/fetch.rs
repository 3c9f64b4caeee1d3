use std::path::Path;

use clap::Parser;

use crate::{
    cli::config::{ConfigArgs, OutputArgs},
    config::Config,
    core::{
        discovery::discover,
        extraction::Extractor,
        record::{ReportKind, ReportTable},
        source::ReportSource,
    },
    export,
    prelude::*,
};

#[derive(Parser)]
pub struct FetchArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    #[clap(flatten)]
    output: OutputArgs,
}

impl FetchArgs {
    pub async fn run(self) -> Result {
        let config = self.config.load()?;
        let output_dir = self.output.create_dir()?;
        let api = config.api()?;
        let [forecast, outturn] = fetch_reports(&api, &config).await;
        save_reports(output_dir, &forecast, &outturn)
    }
}

/// Fetch the forecast and outturn tables, one request at a time.
pub async fn fetch_reports<S: ReportSource>(source: &S, config: &Config) -> [ReportTable; 2] {
    let forecast = fetch_report(source, config, ReportKind::Forecast).await;
    let outturn = fetch_report(source, config, ReportKind::Outturn).await;
    [forecast, outturn]
}

#[instrument(skip_all, fields(kind = ?kind))]
async fn fetch_report<S: ReportSource>(
    source: &S,
    config: &Config,
    kind: ReportKind,
) -> ReportTable {
    let filenames =
        discover(source, config.report_name(kind), config.start_date, config.end_date).await;
    Extractor::builder()
        .source(source)
        .kind(kind)
        .participants(&config.participant_ids)
        .catalog(&config.resource_catalog)
        .build()
        .extract(&filenames)
        .await
}

pub fn save_reports(output_dir: &Path, forecast: &ReportTable, outturn: &ReportTable) -> Result {
    for table in [forecast, outturn] {
        let path = export::table_path(output_dir, table.kind);
        export::write_table(&path, table)?;
        info!(path = %path.display(), n_records = table.len(), "saved");
    }
    Ok(())
}
