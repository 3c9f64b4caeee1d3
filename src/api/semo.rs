//! [SEMO](https://reports.sem-o.com) static-report client.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Url;
use serde::Deserialize;

use crate::{
    core::{document::Document, source::ReportSource},
    prelude::*,
};

pub struct Api {
    client: reqwest::Client,
    index_url: Url,
    documents_url: Url,
    page_size: u32,
    sort_by: String,
}

impl Api {
    pub fn new(
        index_url: Url,
        documents_url: Url,
        page_size: u32,
        sort_by: impl Into<String>,
    ) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(Duration::from_secs(10)).build()?;
        Ok(Self { client, index_url, documents_url, page_size, sort_by: sort_by.into() })
    }

    fn index_url(&self, report_name: &str, on: NaiveDate) -> Url {
        let mut url = self.index_url.clone();
        url.query_pairs_mut()
            .append_pair("ReportName", report_name)
            .append_pair("Date", &on.format("%Y-%m-%d").to_string())
            .append_pair("page_size", &self.page_size.to_string())
            .append_pair("sort_by", &self.sort_by);
        url
    }
}

impl ReportSource for Api {
    #[instrument(skip_all, fields(report_name = report_name, on = %on))]
    async fn list_documents(&self, report_name: &str, on: NaiveDate) -> Result<Vec<String>> {
        let url = self.index_url(report_name, on);
        let page: IndexPage = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request `{url}`"))?
            .error_for_status()
            .context("failed to retrieve the report index")?
            .json()
            .await
            .context("the report index does not contain the expected keys")?;
        debug!(n_items = page.items.len(), "fetched the report index");
        Ok(page.items.into_iter().map(|item| item.resource_name).collect())
    }

    #[instrument(skip_all, fields(filename = filename))]
    async fn get_document(&self, filename: &str) -> Result<Document> {
        let url = self
            .documents_url
            .join(filename)
            .with_context(|| format!("invalid document name `{filename}`"))?;
        let body = self
            .client
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("failed to request `{url}`"))?
            .error_for_status()
            .with_context(|| format!("failed to download `{url}`"))?
            .text()
            .await
            .with_context(|| format!("failed to read the response from `{url}`"))?;
        Document::from_xml(&body).with_context(|| format!("failed to parse `{filename}`"))
    }
}

#[derive(Deserialize)]
struct IndexPage {
    #[serde(default)]
    items: Vec<IndexItem>,
}

#[derive(Deserialize)]
struct IndexItem {
    #[serde(rename = "ResourceName")]
    resource_name: String,
}
