//! Parsing of listings fetched from the backend.
//!
//! This is the boundary where a fetched JSON object is split into scalar
//! fields and typed taxonomy relations. Relation shapes are resolved here
//! once, keyed by the working field name.

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use super::fields::taxonomy_bindings;
use super::SectionPayload;
use crate::domain::foundation::{ListingId, ValidationError};
use crate::domain::taxonomy::{resolve_source, TaxonomyValue};

/// A fetched listing after boundary parsing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteListing {
    pub id: Option<ListingId>,
    pub scalars: SectionPayload,
    pub relations: BTreeMap<&'static str, TaxonomyValue>,
}

impl RemoteListing {
    /// Splits a fetched JSON object into scalars and relations.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if the `id` field is present but unusable.
    pub fn parse(mut object: SectionPayload) -> Result<Self, ValidationError> {
        let id = match object.remove("id") {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(ListingId::new(s)?),
            Some(Value::Number(n)) => Some(ListingId::new(n.to_string())?),
            Some(other) => {
                return Err(ValidationError::invalid_format(
                    "id",
                    format!("unexpected listing id {}", other),
                ))
            }
        };

        let mut relations = BTreeMap::new();
        let mut consumed: HashSet<&'static str> = HashSet::new();

        for binding in taxonomy_bindings() {
            let sources = binding.remote_sources();
            if let Some(sourced) = resolve_source(&object, &sources) {
                relations.insert(binding.field, sourced.value);
            }
            consumed.extend(sources);
        }

        let scalars = object
            .into_iter()
            .filter(|(key, _)| !consumed.contains(key.as_str()))
            .collect();

        Ok(Self {
            id,
            scalars,
            relations,
        })
    }
}
