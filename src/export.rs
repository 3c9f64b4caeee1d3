//! CSV outputs. File names embed the report kind and the week start date.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{
    core::{
        record::{ReportKind, ReportRecord, ReportTable},
        summary::ResourceSummary,
        week::WeeklyBucket,
    },
    prelude::*,
    quantity::energy::MegawattHours,
};

#[must_use]
pub fn table_path(directory: &Path, kind: ReportKind) -> PathBuf {
    directory.join(format!("{}.csv", kind.stem()))
}

#[must_use]
pub fn weekly_table_path(directory: &Path, kind: ReportKind, week_start: NaiveDate) -> PathBuf {
    directory.join(format!("{}_weekly_{}.csv", kind.stem(), week_start.format("%Y-%m-%d")))
}

#[must_use]
pub fn weekly_energy_path(directory: &Path, kind: ReportKind) -> PathBuf {
    directory.join(format!("{}_weekly_mwh.csv", kind.stem()))
}

/// Whole-range summary path when the week is [`None`].
#[must_use]
pub fn summary_path(directory: &Path, week_start: Option<NaiveDate>) -> PathBuf {
    match week_start {
        Some(week_start) => {
            directory.join(format!("summary_{}.csv", week_start.format("%Y-%m-%d")))
        }
        None => directory.join("summary.csv"),
    }
}

pub fn write_table(path: &Path, table: &ReportTable) -> Result {
    write_rows(path, table.records())
}

pub fn read_table(path: &Path, kind: ReportKind) -> Result<ReportTable> {
    Ok(ReportTable::new(kind, read_rows::<ReportRecord>(path)?))
}

pub fn write_summary(path: &Path, summary: &[ResourceSummary]) -> Result {
    write_rows(path, summary)
}

pub fn write_weekly_energy(path: &Path, bucket: &WeeklyBucket) -> Result {
    write_rows(
        path,
        bucket.iter().map(|(resource_id, week_start, energy)| WeeklyEnergyRow {
            resource_id: resource_id.to_owned(),
            week_start,
            energy,
        }),
    )
}

pub fn read_weekly_energy(path: &Path) -> Result<WeeklyBucket> {
    Ok(read_rows::<WeeklyEnergyRow>(path)?
        .into_iter()
        .map(|row| (row.resource_id, row.week_start, row.energy))
        .collect())
}

#[derive(Serialize, Deserialize)]
struct WeeklyEnergyRow {
    #[serde(rename = "ResourceName")]
    resource_id: String,

    #[serde(rename = "WeekStart")]
    week_start: NaiveDate,

    #[serde(rename = "MWh")]
    energy: MegawattHours,
}

#[instrument(skip_all, fields(path = %path.display()))]
fn write_rows<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("failed to create `{}`", path.display()))?;
    let mut n_rows = 0_usize;
    for row in rows {
        writer.serialize(row).with_context(|| format!("failed to write `{}`", path.display()))?;
        n_rows += 1;
    }
    writer.flush().with_context(|| format!("failed to flush `{}`", path.display()))?;
    debug!(n_rows, "written");
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    csv::Reader::from_path(path)
        .with_context(|| format!("failed to open `{}`", path.display()))?
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .with_context(|| format!("failed to read `{}`", path.display()))
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;
    use itertools::Itertools;

    use super::*;
    use crate::{core::record::tests::at, quantity::power::Megawatts};

    #[test]
    fn weekly_energy_round_trip() -> Result {
        let directory = tempfile::tempdir()?;
        let week = |day| NaiveDate::from_ymd_opt(2024, 6, day).unwrap();
        let bucket: WeeklyBucket = [
            ("DSU_401400", week(3), MegawattHours(123.456_789_012_3)),
            ("DSU_401400", week(10), MegawattHours(0.1 + 0.2)),
            ("DSU_503460", week(3), MegawattHours(-0.5)),
        ]
        .into_iter()
        .collect();
        let path = weekly_energy_path(directory.path(), ReportKind::Forecast);
        write_weekly_energy(&path, &bucket)?;
        let restored = read_weekly_energy(&path)?;
        assert_eq!(restored.len(), bucket.len());
        for ((lhs_id, lhs_week, lhs), (rhs_id, rhs_week, rhs)) in
            bucket.iter().zip_eq(restored.iter())
        {
            assert_eq!(lhs_id, rhs_id);
            assert_eq!(lhs_week, rhs_week);
            assert_abs_diff_eq!(lhs.0, rhs.0, epsilon = 1e-9);
        }
        Ok(())
    }

    #[test]
    fn table_round_trip() -> Result {
        let directory = tempfile::tempdir()?;
        let table = ReportTable::new(
            ReportKind::Outturn,
            vec![
                ReportRecord::new(at(3, 0, 30), Megawatts(1.5), "DSU_401400"),
                ReportRecord::new(at(3, 0, 0), Megawatts(2.0), "DSU_503460"),
            ],
        );
        let path = table_path(directory.path(), ReportKind::Outturn);
        write_table(&path, &table)?;
        let contents = std::fs::read_to_string(&path)?;
        assert!(contents.starts_with("Times,Availability,ResourceName\n"), "{contents}");
        let restored = read_table(&path, ReportKind::Outturn)?;
        assert_eq!(restored.records(), table.records());
        Ok(())
    }

    #[test]
    fn summary_header_ok() -> Result {
        let directory = tempfile::tempdir()?;
        let path = summary_path(directory.path(), None);
        write_summary(&path, &[ResourceSummary::from_differences("EE1", [Megawatts(1.0)])])?;
        let contents = std::fs::read_to_string(&path)?;
        assert!(
            contents.starts_with(
                "Name,Over Forecast,Under Forecast,Overall,Percentage Over,Percentage Under\n"
            ),
            "{contents}",
        );
        Ok(())
    }

    #[test]
    fn paths_ok() {
        let directory = Path::new("out");
        let week_start = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        assert_eq!(
            weekly_table_path(directory, ReportKind::Forecast, week_start),
            Path::new("out/forecast_weekly_2024-06-03.csv"),
        );
        assert_eq!(
            summary_path(directory, Some(week_start)),
            Path::new("out/summary_2024-06-03.csv"),
        );
        assert_eq!(summary_path(directory, None), Path::new("out/summary.csv"));
        assert_eq!(table_path(directory, ReportKind::Outturn), Path::new("out/outturn.csv"));
    }
}
