use std::ops::RangeInclusive;

use chrono::{NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::quantity::{energy::MegawattHours, power::Megawatts};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ReportKind {
    Forecast,
    Outturn,
}

impl ReportKind {
    /// Document column which holds the availability value.
    #[must_use]
    pub const fn availability_column(self) -> &'static str {
        match self {
            Self::Forecast => "ForecastAvailability",
            Self::Outturn => "AvgOutturnAvail",
        }
    }

    /// Fixed shift applied to the document timestamps.
    ///
    /// Forecasts are published in UTC, and the shift approximates Irish local time.
    /// Outturn is published as is.
    #[must_use]
    pub const fn timestamp_offset(self) -> TimeDelta {
        match self {
            Self::Forecast => TimeDelta::hours(1),
            Self::Outturn => TimeDelta::zero(),
        }
    }

    /// Output file stem.
    #[must_use]
    pub const fn stem(self) -> &'static str {
        match self {
            Self::Forecast => "forecast",
            Self::Outturn => "outturn",
        }
    }
}

/// Duration of a single report interval.
pub const INTERVAL: TimeDelta = TimeDelta::minutes(30);

#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRecord {
    #[serde(rename = "Times")]
    pub timestamp: NaiveDateTime,

    #[serde(rename = "Availability")]
    pub availability: Megawatts,

    #[serde(rename = "ResourceName")]
    pub resource_id: String,
}

impl ReportRecord {
    pub fn new(
        timestamp: NaiveDateTime,
        availability: Megawatts,
        resource_id: impl Into<String>,
    ) -> Self {
        Self { timestamp, availability, resource_id: resource_id.into() }
    }

    /// Energy over the half-hourly interval.
    pub fn energy(&self) -> MegawattHours {
        self.availability * INTERVAL
    }
}

/// Records of a single report kind, in the order they were collected.
#[must_use]
#[derive(Clone, Debug)]
pub struct ReportTable {
    pub kind: ReportKind,
    records: Vec<ReportRecord>,
}

impl ReportTable {
    pub const fn new(kind: ReportKind, records: Vec<ReportRecord>) -> Self {
        Self { kind, records }
    }

    pub const fn empty(kind: ReportKind) -> Self {
        Self::new(kind, Vec::new())
    }

    #[must_use]
    pub fn records(&self) -> &[ReportRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn push(&mut self, record: ReportRecord) {
        self.records.push(record);
    }

    pub fn for_resource<'a>(
        &'a self,
        resource_id: &'a str,
    ) -> impl Iterator<Item = &'a ReportRecord> + 'a {
        self.records.iter().filter(move |record| record.resource_id == resource_id)
    }

    #[must_use]
    pub fn time_span(&self) -> Option<RangeInclusive<NaiveDateTime>> {
        let min = self.records.iter().map(|record| record.timestamp).min()?;
        let max = self.records.iter().map(|record| record.timestamp).max()?;
        Some(min..=max)
    }
}

impl Extend<ReportRecord> for ReportTable {
    fn extend<T: IntoIterator<Item = ReportRecord>>(&mut self, iter: T) {
        self.records.extend(iter);
    }
}

impl IntoIterator for ReportTable {
    type Item = ReportRecord;
    type IntoIter = std::vec::IntoIter<ReportRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}
