use std::{fs, path::Path};

use chrono::NaiveDate;
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::{
    api::semo,
    core::{
        catalog::{ParticipantIds, ResourceCatalog},
        record::ReportKind,
        summary::PairingPolicy,
    },
    prelude::*,
};

/// Report settings, loaded from a TOML file where every field is optional.
#[must_use]
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// First report date, inclusive.
    pub start_date: NaiveDate,

    /// Last report date, inclusive.
    pub end_date: NaiveDate,

    pub page_size: u32,
    pub sort_by: String,
    pub forecast_report_name: String,
    pub outturn_report_name: String,

    /// `[roi, ni]`.
    pub participant_ids: ParticipantIds,

    /// Resource label to resource ID.
    pub resource_catalog: ResourceCatalog,

    /// Static report index endpoint.
    pub index_url: String,

    /// Base URL of the report documents, with the trailing slash.
    pub documents_url: String,

    pub pairing: PairingPolicy,
}

impl Default for Config {
    fn default() -> Self {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap_or_default();
        Self {
            start_date: date,
            end_date: date,
            page_size: 1,
            sort_by: "PublishTime".to_owned(),
            forecast_report_name: "Forecast Availability".to_owned(),
            outturn_report_name: "Average Outturn Availability".to_owned(),
            participant_ids: ParticipantIds::new("PT_400116", "PT_502516"),
            resource_catalog: [
                ("EE1", "DSU_401400"),
                ("EE2", "DSU_401870"),
                ("EE3", "DSU_402100"),
                ("EE4", "DSU_402120"),
                ("EE5", "DSU_402090"),
                ("EE6", "DSU_403520"),
                ("EE7", "DSU_403560"),
                ("EE8", "DSU_403630"),
                ("EE9", "DSU_403640"),
                ("VN1", "DSU_503460"),
                ("VS1", "DSU_403730"),
                ("VS2", "DSU_403760"),
            ]
            .into_iter()
            .collect(),
            index_url: "https://reports.sem-o.com/api/v1/documents/static-reports".to_owned(),
            documents_url: "https://reports.sem-o.com/documents/".to_owned(),
            pairing: PairingPolicy::default(),
        }
    }
}

impl Config {
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read `{}`", path.display()))?;
        toml::from_str(&contents).with_context(|| format!("failed to parse `{}`", path.display()))
    }

    pub fn validate(&self) -> Result {
        ensure!(
            self.start_date <= self.end_date,
            "start date {} is after end date {}",
            self.start_date,
            self.end_date,
        );
        ensure!(!self.resource_catalog.is_empty(), "the resource catalog is empty");
        ensure!(self.page_size != 0, "page size must be positive");
        Ok(())
    }

    #[must_use]
    pub fn report_name(&self, kind: ReportKind) -> &str {
        match kind {
            ReportKind::Forecast => &self.forecast_report_name,
            ReportKind::Outturn => &self.outturn_report_name,
        }
    }

    pub fn api(&self) -> Result<semo::Api> {
        let index_url = Url::parse(&self.index_url)
            .with_context(|| format!("invalid index URL `{}`", self.index_url))?;
        let documents_url = Url::parse(&self.documents_url)
            .with_context(|| format!("invalid documents URL `{}`", self.documents_url))?;
        semo::Api::new(index_url, documents_url, self.page_size, &self.sort_by)
    }
}
