//! Column-to-field mapping types.
//!
//! A [`Mapping`] associates external spreadsheet column names with field
//! machine names. It is a transient value object: it is never persisted as an
//! entity, only snapshotted onto each imported record for traceability.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mapping from external column name to field machine name.
///
/// An entry with an empty target means "this column is deliberately left
/// unmapped"; validators skip such entries rather than flagging them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping(BTreeMap<String, String>);

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, field_name: impl Into<String>) {
        self.0.insert(column.into(), field_name.into());
    }

    /// Target field name for a column, if the column is mapped at all
    /// (an empty target is still returned; callers decide how to treat it).
    pub fn target_for(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    /// Iterate `(external_column, field_name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(col, field)| (col.as_str(), field.as_str()))
    }

    /// Target field names with the empty placeholders filtered out.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str).filter(|t| !t.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for Mapping {
    fn from(entries: BTreeMap<String, String>) -> Self {
        Self(entries)
    }
}

impl FromIterator<(String, String)> for Mapping {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Which declared attribute of a field produced the winning similarity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    Name,
    Label,
}

/// A ranked candidate mapping for one external column. Transient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchSuggestion {
    pub field_name: String,
    pub field_label: Option<String>,
    /// Similarity score in [0, 1].
    pub score: f64,
    pub match_type: MatchSource,
}

impl MatchSuggestion {
    /// Score as a whole-number percentage, for display.
    pub fn confidence(&self) -> u32 {
        (self.score * 100.0).round() as u32
    }
}
