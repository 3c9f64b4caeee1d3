use chrono::NaiveDate;

use crate::{core::document::Document, prelude::*};

/// Where the report documents come from.
pub trait ReportSource {
    /// Names of all documents published for the report on the date.
    async fn list_documents(&self, report_name: &str, on: NaiveDate) -> Result<Vec<String>>;

    async fn get_document(&self, filename: &str) -> Result<Document>;
}

#[cfg(test)]
pub mod tests {
    use std::{cell::Cell, collections::HashMap};

    use super::*;

    /// In-memory source which counts the requests.
    #[derive(Default)]
    pub struct FakeSource {
        pub index: HashMap<(String, NaiveDate), Vec<String>>,
        pub documents: HashMap<String, String>,
        pub n_requests: Cell<usize>,
    }

    impl FakeSource {
        pub fn with_index(mut self, report_name: &str, on: NaiveDate, names: &[&str]) -> Self {
            self.index.insert(
                (report_name.to_owned(), on),
                names.iter().map(|name| (*name).to_owned()).collect(),
            );
            self
        }

        pub fn with_document(mut self, filename: &str, xml: &str) -> Self {
            self.documents.insert(filename.to_owned(), xml.to_owned());
            self
        }
    }

    impl ReportSource for FakeSource {
        async fn list_documents(&self, report_name: &str, on: NaiveDate) -> Result<Vec<String>> {
            self.n_requests.set(self.n_requests.get() + 1);
            self.index
                .get(&(report_name.to_owned(), on))
                .cloned()
                .with_context(|| format!("HTTP 404 for `{report_name}` on {on}"))
        }

        async fn get_document(&self, filename: &str) -> Result<Document> {
            self.n_requests.set(self.n_requests.get() + 1);
            let xml = self
                .documents
                .get(filename)
                .with_context(|| format!("HTTP 404 for `{filename}`"))?;
            Document::from_xml(xml)
        }
    }
}
