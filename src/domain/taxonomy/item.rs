//! Taxonomy item identifiers and hydrated items.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of a taxonomy item.
///
/// The backend mixes integer and string keys across tables, so both are
/// carried through untouched. Ids are never coerced: `Text("1")` and
/// `Int(1)` are different ids, so a string id looked up in an integer
/// table is unknown and keeps an empty label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaxonomyId {
    Int(i64),
    Text(String),
}

impl fmt::Display for TaxonomyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaxonomyId::Int(n) => write!(f, "{}", n),
            TaxonomyId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for TaxonomyId {
    fn from(value: i64) -> Self {
        TaxonomyId::Int(value)
    }
}

impl From<&str> for TaxonomyId {
    fn from(value: &str) -> Self {
        TaxonomyId::Text(value.to_string())
    }
}

impl From<String> for TaxonomyId {
    fn from(value: String) -> Self {
        TaxonomyId::Text(value)
    }
}

/// A hydrated taxonomy reference: id plus display label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaxonomyItem {
    pub id: TaxonomyId,
    #[serde(default, alias = "name")]
    pub label: String,
}

impl TaxonomyItem {
    /// Creates a labelled item.
    pub fn new(id: impl Into<TaxonomyId>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }

    /// Creates an item for an id the reference list does not know.
    pub fn unlabelled(id: TaxonomyId) -> Self {
        Self {
            id,
            label: String::new(),
        }
    }
}
