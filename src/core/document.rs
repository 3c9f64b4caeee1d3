use std::{
    borrow::Cow,
    collections::{BTreeSet, HashMap},
};

use quick_xml::{
    Reader,
    events::{BytesStart, Event},
};

use crate::prelude::*;

/// Tabular view of a report document.
///
/// Every child element of the root is a row. The row columns are the element attributes
/// and the text of its own child elements.
#[must_use]
#[derive(Clone, Debug, Default)]
pub struct Document {
    columns: BTreeSet<String>,
    rows: Vec<Row>,
}

impl Document {
    pub fn from_xml(xml: &str) -> Result<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut document = Self::default();
        let mut depth = 0_usize;
        let mut row: Option<Row> = None;
        let mut field: Option<String> = None;

        loop {
            match reader.read_event().context("malformed XML")? {
                Event::Start(element) => {
                    depth += 1;
                    match depth {
                        2 => row = Some(Row::from_attributes(&element)?),
                        3 => field = Some(local_name(&element)?),
                        _ => {}
                    }
                }
                Event::Empty(element) => match depth + 1 {
                    2 => document.push(Row::from_attributes(&element)?),
                    3 => {
                        // Present, but without a value.
                        let name = local_name(&element)?;
                        if let Some(row) = &mut row {
                            row.insert(name, String::new());
                        }
                    }
                    _ => {}
                },
                Event::Text(text) if depth == 3 => {
                    if let (Some(row), Some(field)) = (&mut row, &field) {
                        row.insert(field.clone(), text.unescape()?.into_owned());
                    }
                }
                Event::End(_) => {
                    match depth {
                        2 => {
                            if let Some(row) = row.take() {
                                document.push(row);
                            }
                        }
                        3 => {
                            // The element may have had no text at all.
                            if let (Some(row), Some(field)) = (&mut row, field.take()) {
                                row.0.entry(field).or_default();
                            }
                        }
                        _ => {}
                    }
                    depth = depth.saturating_sub(1);
                }
                Event::Eof => break,
                _ => {}
            }
        }

        for row in &document.rows {
            document.columns.extend(row.0.keys().cloned());
        }
        Ok(document)
    }

    fn push(&mut self, row: Row) {
        self.rows.push(row);
    }

    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains(name)
    }

    /// Names of the requested columns that the document lacks.
    #[must_use]
    pub fn missing_columns<'a>(&self, names: &[&'a str]) -> Vec<&'a str> {
        names.iter().copied().filter(|name| !self.has_column(name)).collect()
    }

    #[must_use]
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }
}

#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row(HashMap<String, String>);

impl Row {
    fn from_attributes(element: &BytesStart<'_>) -> Result<Self> {
        let mut row = Self::default();
        for attribute in element.attributes() {
            let attribute = attribute.context("malformed attribute")?;
            if attribute.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = std::str::from_utf8(attribute.key.local_name().as_ref())?.to_owned();
            let value: Cow<'_, str> = attribute.unescape_value()?;
            row.insert(key, value.into_owned());
        }
        Ok(row)
    }

    fn insert(&mut self, column: String, value: String) {
        self.0.insert(column, value);
    }

    /// Non-empty value of the column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(|value| value.trim()).filter(|value| !value.is_empty())
    }
}

fn local_name(element: &BytesStart<'_>) -> Result<String> {
    Ok(std::str::from_utf8(element.local_name().as_ref())?.to_owned())
}
