use bon::Builder;
use chrono::{DateTime, NaiveDateTime};

use crate::{
    core::{
        catalog::{ParticipantIds, ResourceCatalog},
        document::{Document, Row},
        record::{ReportKind, ReportRecord, ReportTable},
        source::ReportSource,
    },
    prelude::*,
    quantity::power::Megawatts,
};

const PARTICIPANT_COLUMN: &str = "ParticipantName";
const START_TIME_COLUMN: &str = "StartTime";
const RESOURCE_COLUMN: &str = "ResourceName";

/// Downloads the documents and collects the relevant rows into a [`ReportTable`].
#[derive(Builder)]
pub struct Extractor<'a, S> {
    source: &'a S,
    kind: ReportKind,
    participants: &'a ParticipantIds,
    catalog: &'a ResourceCatalog,
}

impl<S: ReportSource> Extractor<'_, S> {
    /// Fetch the documents one by one, keeping the file order and then the row order.
    ///
    /// Documents which cannot be fetched, parsed, or lack the expected columns are skipped.
    #[instrument(skip_all, fields(kind = ?self.kind, n_documents = filenames.len()))]
    pub async fn extract(&self, filenames: &[String]) -> ReportTable {
        let mut table = ReportTable::empty(self.kind);
        for filename in filenames {
            let document = match self.source.get_document(filename).await {
                Ok(document) => document,
                Err(error) => {
                    warn!(filename, "skipping the document: {error:#}");
                    continue;
                }
            };
            let n_before = table.len();
            match self.records(&document) {
                Ok(records) => table.extend(records),
                Err(error) => {
                    warn!(filename, "skipping the document: {error:#}");
                    continue;
                }
            }
            debug!(filename, n_records = table.len() - n_before, "extracted");
        }
        info!(n_records = table.len(), "extracted the report table");
        table
    }

    fn records(&self, document: &Document) -> Result<Vec<ReportRecord>> {
        let missing_columns = document.missing_columns(&[
            PARTICIPANT_COLUMN,
            START_TIME_COLUMN,
            RESOURCE_COLUMN,
            self.kind.availability_column(),
        ]);
        ensure!(missing_columns.is_empty(), "missing columns: {}", missing_columns.join(", "));

        Ok(document
            .rows()
            .iter()
            .filter(|row| {
                row.get(PARTICIPANT_COLUMN).is_some_and(|id| self.participants.contains(id))
            })
            .filter(|row| row.get(RESOURCE_COLUMN).is_some_and(|id| self.catalog.contains_id(id)))
            .filter_map(|row| match self.parse_row(row) {
                Ok(record) => Some(record),
                Err(error) => {
                    debug!("dropping the row: {error:#}");
                    None
                }
            })
            .collect())
    }

    fn parse_row(&self, row: &Row) -> Result<ReportRecord> {
        let column = self.kind.availability_column();
        let resource_id = row.get(RESOURCE_COLUMN).context("missing resource name")?;
        let timestamp = row.get(START_TIME_COLUMN).context("missing start time")?;
        let timestamp = parse_timestamp(timestamp)?;
        let availability = row.get(column).with_context(|| format!("missing `{column}`"))?;
        let availability = availability
            .parse::<f64>()
            .with_context(|| format!("invalid `{column}`: `{availability}`"))?;
        ensure!(availability.is_finite(), "non-finite `{column}`: `{availability}`");
        Ok(ReportRecord::new(
            timestamp + self.kind.timestamp_offset(),
            Megawatts(availability),
            resource_id,
        ))
    }
}

/// Parse the document timestamp into its wall clock time.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime> {
    value
        .parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S"))
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|timestamp| timestamp.naive_utc()))
        .with_context(|| format!("invalid timestamp: `{value}`"))
}
