use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::{
    core::{
        catalog::ResourceCatalog,
        record::{ReportKind, ReportRecord, ReportTable},
    },
    prelude::*,
    quantity::power::Megawatts,
};

/// What to do with intervals present in only one of the tables.
#[derive(
    Copy, Clone, Debug, Default, Eq, PartialEq, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Fail the summary.
    #[default]
    Strict,

    /// Compare the common intervals only, and warn about the rest.
    Intersect,
}

/// Over- and under-forecast breakdown of a single resource.
#[must_use]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResourceSummary {
    #[serde(rename = "Name")]
    pub label: String,

    #[serde(rename = "Over Forecast")]
    pub over_forecast: Megawatts,

    #[serde(rename = "Under Forecast")]
    pub under_forecast: Megawatts,

    #[serde(rename = "Overall")]
    pub overall: Megawatts,

    #[serde(rename = "Percentage Over")]
    pub percentage_over: f64,

    #[serde(rename = "Percentage Under")]
    pub percentage_under: f64,
}

impl ResourceSummary {
    /// Build the summary from `forecast - outturn` differences.
    pub fn from_differences(
        label: impl Into<String>,
        differences: impl IntoIterator<Item = Megawatts>,
    ) -> Self {
        let mut over_forecast = Megawatts::ZERO;
        let mut under_forecast = Megawatts::ZERO;
        for difference in differences {
            // Exact matches add nothing to either side.
            if difference > Megawatts::ZERO {
                over_forecast += difference;
            } else if difference < Megawatts::ZERO {
                under_forecast += -difference;
            }
        }
        let overall = over_forecast + under_forecast;

        let percentage_over =
            match (over_forecast == Megawatts::ZERO, under_forecast == Megawatts::ZERO) {
                (true, true) => 50.0,
                (false, true) => 100.0,
                (true, false) => 0.0,
                (false, false) => over_forecast / overall * 100.0,
            };

        Self {
            label: label.into(),
            over_forecast,
            under_forecast,
            overall,
            percentage_over,
            percentage_under: 100.0 - percentage_over,
        }
    }
}

/// Summarise every catalog resource, in the catalog order.
///
/// Forecast and outturn are compared at equal timestamps.
#[instrument(skip_all, fields(n_forecast = forecast.len(), n_outturn = outturn.len()))]
pub fn summarize(
    catalog: &ResourceCatalog,
    forecast: &ReportTable,
    outturn: &ReportTable,
    pairing: PairingPolicy,
) -> Result<Vec<ResourceSummary>> {
    catalog
        .iter()
        .map(|(label, resource_id)| {
            let differences = pair(
                label,
                forecast.for_resource(resource_id),
                outturn.for_resource(resource_id),
                pairing,
            )
            .with_context(|| format!("failed to summarise `{label}` ({resource_id})"))?;
            Ok(ResourceSummary::from_differences(label, differences))
        })
        .collect()
}

fn pair<'a>(
    label: &str,
    forecast: impl Iterator<Item = &'a ReportRecord>,
    outturn: impl Iterator<Item = &'a ReportRecord>,
    pairing: PairingPolicy,
) -> Result<Vec<Megawatts>> {
    let forecast = index_by_timestamp(ReportKind::Forecast, forecast)?;
    let outturn = index_by_timestamp(ReportKind::Outturn, outturn)?;

    let n_forecast_only =
        forecast.keys().filter(|timestamp| !outturn.contains_key(timestamp)).count();
    let n_outturn_only =
        outturn.keys().filter(|timestamp| !forecast.contains_key(timestamp)).count();
    if n_forecast_only != 0 || n_outturn_only != 0 {
        match pairing {
            PairingPolicy::Strict => bail!(
                "{n_forecast_only} forecast intervals have no outturn, \
                 and {n_outturn_only} outturn intervals have no forecast",
            ),
            PairingPolicy::Intersect => {
                warn!(label, n_forecast_only, n_outturn_only, "comparing the common intervals only");
            }
        }
    }

    Ok(forecast
        .into_iter()
        .filter_map(|(timestamp, forecast)| {
            outturn.get(&timestamp).map(|outturn| forecast - *outturn)
        })
        .collect())
}

fn index_by_timestamp<'a>(
    kind: ReportKind,
    records: impl Iterator<Item = &'a ReportRecord>,
) -> Result<BTreeMap<NaiveDateTime, Megawatts>> {
    let mut index = BTreeMap::new();
    for record in records {
        ensure!(
            index.insert(record.timestamp, record.availability).is_none(),
            "duplicate {kind:?} interval at {}",
            record.timestamp,
        );
    }
    Ok(index)
}
