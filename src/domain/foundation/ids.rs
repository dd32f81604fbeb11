//! Strongly-typed identifier value objects.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// External identifier of a listing on the marketplace backend.
///
/// The backend treats it as opaque, so no format is imposed beyond
/// being non-blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ListingId(String);

impl ListingId {
    /// Creates a ListingId, rejecting blank input.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::empty_field("listing_id"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ListingId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

/// Identifier of one wizard session.
///
/// A new session starts every time the wizard is entered fresh; a reload
/// resumes the stored one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DraftSessionId(Uuid);

impl DraftSessionId {
    /// Creates a new random DraftSessionId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a DraftSessionId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for DraftSessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for DraftSessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DraftSessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listing_id_trims_whitespace() {
        let id = ListingId::new("  lst-42 ").unwrap();
        assert_eq!(id.as_str(), "lst-42");
    }

    #[test]
    fn listing_id_rejects_blank() {
        assert!(ListingId::new("   ").is_err());
        assert!("".parse::<ListingId>().is_err());
    }

    #[test]
    fn listing_id_serializes_transparently() {
        let id = ListingId::new("abc").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
    }

    #[test]
    fn session_id_generates_unique_values() {
        assert_ne!(DraftSessionId::new(), DraftSessionId::new());
    }

    #[test]
    fn session_id_parses_from_string() {
        let id = DraftSessionId::new();
        let parsed: DraftSessionId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
    }
}
