use chrono::NaiveDate;

use crate::{core::source::ReportSource, prelude::*};

/// Extension of the documents we are able to read.
const DOCUMENT_EXTENSION: &str = ".xml";

/// Collect the document names published for the report on each date of the range.
///
/// The names are concatenated in date order, and within a date they are kept in the order
/// the index returned them. A date which fails to load contributes nothing.
#[instrument(skip_all, fields(report_name = report_name, since = %since, until = %until))]
pub async fn discover<S: ReportSource>(
    source: &S,
    report_name: &str,
    since: NaiveDate,
    until: NaiveDate,
) -> Vec<String> {
    let mut filenames = Vec::new();
    for on in since.iter_days().take_while(|on| *on <= until) {
        match source.list_documents(report_name, on).await {
            Ok(names) => {
                let n_before = filenames.len();
                filenames
                    .extend(names.into_iter().filter(|name| name.ends_with(DOCUMENT_EXTENSION)));
                info!(%on, n_documents = filenames.len() - n_before, "discovered");
            }
            Err(error) => {
                warn!(%on, "skipping the date: {error:#}");
            }
        }
    }
    filenames
}
