use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Resource label to canonical resource ID mapping, iterated in label order.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceCatalog(BTreeMap<String, String>);

impl ResourceCatalog {
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over `(label, resource_id)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(label, id)| (label.as_str(), id.as_str()))
    }

    #[must_use]
    pub fn contains_id(&self, resource_id: &str) -> bool {
        self.0.values().any(|id| id == resource_id)
    }
}

impl<L: Into<String>, I: Into<String>> FromIterator<(L, I)> for ResourceCatalog {
    fn from_iter<T: IntoIterator<Item = (L, I)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(label, id)| (label.into(), id.into())).collect())
    }
}

/// Market participants whose document rows are relevant.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[String; 2]", into = "[String; 2]")]
pub struct ParticipantIds {
    /// Republic of Ireland.
    pub roi: String,

    /// Northern Ireland.
    pub ni: String,
}

impl ParticipantIds {
    pub fn new(roi: impl Into<String>, ni: impl Into<String>) -> Self {
        Self { roi: roi.into(), ni: ni.into() }
    }

    #[must_use]
    pub fn contains(&self, participant: &str) -> bool {
        participant == self.roi || participant == self.ni
    }
}

impl From<[String; 2]> for ParticipantIds {
    fn from([roi, ni]: [String; 2]) -> Self {
        Self { roi, ni }
    }
}

impl From<ParticipantIds> for [String; 2] {
    fn from(ids: ParticipantIds) -> Self {
        [ids.roi, ids.ni]
    }
}
