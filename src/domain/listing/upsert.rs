//! Partial upsert payloads sent to the listing backend.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::warn;

use super::fields::binding_for;
use super::{Section, SectionPayload};
use crate::domain::foundation::ListingId;
use crate::domain::taxonomy::{
    dehydrate, normalize_attribute, resolve_source, write_dehydrated, TaxonomyValue,
};

/// A partial write of one section.
///
/// Taxonomy attributes are dehydrated to bare ids and written under both
/// the working and the legacy names, so consumers on either schema see
/// the change. A relation whose submitted sources are all malformed is
/// left out, so the stored relation is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct UpsertPayload {
    pub id: Option<ListingId>,
    pub section: Section,
    pub fields: Map<String, Value>,
}

impl UpsertPayload {
    /// Builds the upsert for a submitted section payload.
    pub fn from_section(id: Option<ListingId>, section: Section, payload: &SectionPayload) -> Self {
        let mut fields = Map::new();
        let mut handled: HashSet<&'static str> = HashSet::new();

        for (key, value) in payload {
            let binding = match binding_for(key) {
                Some(binding) if binding.category().is_some() => binding,
                _ => {
                    fields.insert(key.clone(), value.clone());
                    continue;
                }
            };
            if !handled.insert(binding.field) {
                continue;
            }

            let sources = binding.local_sources();
            let readable = sources.iter().any(|&name| {
                payload
                    .get(name)
                    .is_some_and(|raw| TaxonomyValue::from_json(name, raw).is_ok())
            });
            if !readable {
                warn!(field = binding.field, "Leaving malformed relation out of upsert");
                continue;
            }

            let ids = match (binding.category(), resolve_source(payload, &sources)) {
                (Some(category), Some(sourced)) => {
                    dehydrate(&normalize_attribute(category, &sourced.value, &[]))
                }
                _ => Vec::new(),
            };
            write_dehydrated(&mut fields, &binding.write_names(), &ids);
        }

        Self {
            id,
            section,
            fields,
        }
    }

    /// Whether this write creates a new listing.
    pub fn is_create(&self) -> bool {
        self.id.is_none()
    }

    /// JSON body for the backend: the fields plus `id` when known.
    pub fn to_json(&self) -> Value {
        let mut body = self.fields.clone();
        if let Some(id) = &self.id {
            body.insert("id".to_string(), Value::String(id.to_string()));
        }
        Value::Object(body)
    }
}

/// Backend acknowledgement of an upsert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpsertReceipt {
    pub id: ListingId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload(value: Value) -> SectionPayload {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn scalars_pass_through() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Info,
            &payload(json!({"name": "Maple", "bedrooms": 3})),
        );
        assert!(upsert.is_create());
        assert_eq!(upsert.to_json(), json!({"name": "Maple", "bedrooms": 3}));
    }

    #[test]
    fn hydrated_relation_is_written_under_current_and_legacy_names() {
        let upsert = UpsertPayload::from_section(
            Some(ListingId::new("L9").unwrap()),
            Section::Amenities,
            &payload(json!({
                "amenities": [{"id": 1, "label": "Pool"}, {"id": 4, "label": "Gym"}],
            })),
        );

        assert_eq!(
            upsert.to_json(),
            json!({
                "id": "L9",
                "amenities": [1, 4],
                "amenity_ids": [1, 4],
            })
        );
    }

    #[test]
    fn single_select_is_clamped_to_one_id() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Info,
            &payload(json!({"basementType": [{"id": 1, "label": "A"}, {"id": 2, "label": "B"}]})),
        );
        assert_eq!(upsert.fields.get("basementType"), Some(&json!([1])));
        assert_eq!(upsert.fields.get("basement_type_id"), Some(&json!([1])));
    }

    #[test]
    fn current_and_legacy_in_payload_use_current_once() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Info,
            &payload(json!({"roomTypes": [2], "room_type_ids": [9]})),
        );
        assert_eq!(upsert.fields.get("roomTypes"), Some(&json!([2])));
        assert_eq!(upsert.fields.get("room_type_ids"), Some(&json!([2])));
    }

    #[test]
    fn cleared_relation_writes_empty_lists() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Amenities,
            &payload(json!({"roofTypes": []})),
        );
        assert_eq!(upsert.fields.get("roofTypes"), Some(&json!([])));
        assert_eq!(upsert.fields.get("roof_type_ids"), Some(&json!([])));
    }

    #[test]
    fn malformed_relation_is_left_out() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Info,
            &payload(json!({"name": "A", "roomTypes": true})),
        );
        assert_eq!(upsert.to_json(), json!({"name": "A"}));
    }

    #[test]
    fn malformed_current_name_falls_back_to_legacy() {
        let upsert = UpsertPayload::from_section(
            None,
            Section::Info,
            &payload(json!({"roomTypes": {"label": "Den"}, "room_type_ids": [2]})),
        );
        assert_eq!(upsert.fields.get("roomTypes"), Some(&json!([2])));
        assert_eq!(upsert.fields.get("room_type_ids"), Some(&json!([2])));
    }

    #[test]
    fn receipt_deserializes() {
        let receipt: UpsertReceipt = serde_json::from_value(json!({"id": "L1"})).unwrap();
        assert_eq!(receipt.id.as_str(), "L1");
    }
}
