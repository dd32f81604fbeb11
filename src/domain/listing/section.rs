//! Logical sections of a listing draft.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The payload one wizard step submits for its section.
pub type SectionPayload = Map<String, Value>;

/// A logical section of the listing; one per wizard step.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Location,
    Info,
    Media,
    Amenities,
    Contact,
}

impl Section {
    /// All sections in wizard order.
    pub const ALL: [Section; 5] = [
        Section::Location,
        Section::Info,
        Section::Media,
        Section::Amenities,
        Section::Contact,
    ];

    /// Key of the section in the persisted draft record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Section::Location => "location",
            Section::Info => "info",
            Section::Media => "media",
            Section::Amenities => "amenities",
            Section::Contact => "contact",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
