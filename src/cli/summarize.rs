use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};

use chrono::NaiveDate;
use clap::Parser;

use crate::{
    cli::config::{ConfigArgs, OutputArgs},
    config::Config,
    core::{
        means::ResourceMeans,
        record::{ReportKind, ReportTable},
        summary::summarize,
        week::{Weeks, WeeklyBucket, split_weekly},
    },
    export,
    prelude::*,
    tables::{build_means_table, build_summary_table, build_weekly_energy_table},
};

#[derive(Parser)]
pub struct SummarizeArgs {
    #[clap(flatten)]
    config: ConfigArgs,

    /// Directory with `forecast.csv` and `outturn.csv`, where the outputs also go.
    #[clap(flatten)]
    output: OutputArgs,
}

impl SummarizeArgs {
    pub fn run(self) -> Result {
        let config = self.config.load()?;
        let output_dir = self.output.create_dir()?;
        let forecast = export::read_table(
            &export::table_path(output_dir, ReportKind::Forecast),
            ReportKind::Forecast,
        )?;
        let outturn = export::read_table(
            &export::table_path(output_dir, ReportKind::Outturn),
            ReportKind::Outturn,
        )?;
        summarize_reports(&config, &forecast, &outturn, output_dir)
    }
}

/// Aggregate, summarise, print, and save everything derived from the two tables.
///
/// The weekly energy and the weekly splits are written before the summaries, so a pairing
/// failure only stops the summary files.
#[instrument(skip_all, fields(n_forecast = forecast.len(), n_outturn = outturn.len()))]
pub fn summarize_reports(
    config: &Config,
    forecast: &ReportTable,
    outturn: &ReportTable,
    output_dir: &Path,
) -> Result {
    let catalog = &config.resource_catalog;

    let means = ResourceMeans::compute(catalog, forecast, outturn);
    println!("{}", build_means_table(&means));

    let [forecast_weekly, outturn_weekly] = match Weeks::spanning([forecast, outturn]) {
        Some(weeks) => aggregate_weekly(config, forecast, outturn, weeks, output_dir)?,
        None => {
            warn!("both reports are empty, nothing to aggregate");
            [BTreeMap::new(), BTreeMap::new()]
        }
    };

    let summary = summarize(catalog, forecast, outturn, config.pairing)?;
    export::write_summary(&export::summary_path(output_dir, None), &summary)?;
    println!("{}", build_summary_table(&summary));

    let empty_forecast = ReportTable::empty(ReportKind::Forecast);
    let empty_outturn = ReportTable::empty(ReportKind::Outturn);
    let week_starts: BTreeSet<NaiveDate> =
        forecast_weekly.keys().chain(outturn_weekly.keys()).copied().collect();
    for week_start in week_starts {
        let summary = summarize(
            catalog,
            forecast_weekly.get(&week_start).unwrap_or(&empty_forecast),
            outturn_weekly.get(&week_start).unwrap_or(&empty_outturn),
            config.pairing,
        )
        .with_context(|| format!("failed to summarise the week of {week_start}"))?;
        export::write_summary(&export::summary_path(output_dir, Some(week_start)), &summary)?;
        info!(%week_start, "summarised the week");
    }

    Ok(())
}

/// Save and print the weekly energy, then save the weekly splits.
///
/// Returns the forecast and outturn weekly splits.
fn aggregate_weekly(
    config: &Config,
    forecast: &ReportTable,
    outturn: &ReportTable,
    weeks: Weeks,
    output_dir: &Path,
) -> Result<[BTreeMap<NaiveDate, ReportTable>; 2]> {
    let forecast_energy = WeeklyBucket::aggregate(forecast, weeks);
    let outturn_energy = WeeklyBucket::aggregate(outturn, weeks);
    info!(
        forecast = %forecast_energy.total(),
        outturn = %outturn_energy.total(),
        "aggregated the weekly energy",
    );
    export::write_weekly_energy(
        &export::weekly_energy_path(output_dir, ReportKind::Forecast),
        &forecast_energy,
    )?;
    export::write_weekly_energy(
        &export::weekly_energy_path(output_dir, ReportKind::Outturn),
        &outturn_energy,
    )?;
    println!(
        "{}",
        build_weekly_energy_table(&config.resource_catalog, &forecast_energy, &outturn_energy),
    );

    let forecast_weekly = split_weekly(forecast, weeks);
    let outturn_weekly = split_weekly(outturn, weeks);
    for (week_start, table) in forecast_weekly.iter().chain(&outturn_weekly) {
        let path = export::weekly_table_path(output_dir, table.kind, *week_start);
        export::write_table(&path, table)?;
    }
    Ok([forecast_weekly, outturn_weekly])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        cli::fetch::{
            fetch_reports,
            tests::{config, source},
        },
        core::summary::PairingPolicy,
        quantity::energy::MegawattHours,
    };

    #[tokio::test]
    async fn summarize_reports_ok() -> Result {
        let directory = tempfile::tempdir()?;
        let config = config();
        let [forecast, outturn] = fetch_reports(&source(), &config).await;

        // The forecast on June 4 has no outturn.
        assert!(summarize_reports(&config, &forecast, &outturn, directory.path()).is_err());
        assert!(directory.path().join("forecast_weekly_mwh.csv").exists());
        assert!(directory.path().join("outturn_weekly_2024-06-03.csv").exists());
        assert!(!directory.path().join("summary.csv").exists());

        let config = Config { pairing: PairingPolicy::Intersect, ..config };
        summarize_reports(&config, &forecast, &outturn, directory.path())?;
        for name in [
            "summary.csv",
            "summary_2024-06-03.csv",
            "forecast_weekly_2024-06-03.csv",
            "outturn_weekly_2024-06-03.csv",
            "forecast_weekly_mwh.csv",
            "outturn_weekly_mwh.csv",
        ] {
            assert!(directory.path().join(name).exists(), "{name}");
        }

        let energy = export::read_weekly_energy(&directory.path().join("forecast_weekly_mwh.csv"))?;
        let week_start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(energy.get("DSU_401400", week_start), Some(MegawattHours(12.0)));

        let summary = std::fs::read_to_string(directory.path().join("summary.csv"))?;
        assert!(summary.contains("EE1,2.0,2.0,4.0,50.0,50.0"), "{summary}");
        Ok(())
    }

    #[test]
    fn empty_reports_ok() -> Result {
        let directory = tempfile::tempdir()?;
        let forecast = ReportTable::empty(ReportKind::Forecast);
        let outturn = ReportTable::empty(ReportKind::Outturn);
        summarize_reports(&config(), &forecast, &outturn, directory.path())?;
        assert!(directory.path().join("summary.csv").exists());
        assert!(!directory.path().join("forecast_weekly_mwh.csv").exists());
        Ok(())
    }
}
