//! Normalization between raw and hydrated taxonomy references.
//!
//! One generic pair of operations serves every category:
//!
//! - [`normalize`] turns bare ids into `{id, label}` items using a reference
//!   list, leaving already hydrated values alone.
//! - [`dehydrate`] turns items back into bare ids for persistence.
//!
//! Field-name drift is handled by [`resolve_source`], which picks the first
//! non-empty of several candidate field names, and by [`write_dehydrated`],
//! which writes the same ids under the current and legacy names.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};
use tracing::warn;

use super::{Cardinality, TaxonomyCategory, TaxonomyId, TaxonomyItem, TaxonomyValue};

/// A taxonomy value together with the field it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedValue {
    pub field: String,
    pub value: TaxonomyValue,
}

/// Hydrates a value against a reference list.
///
/// Hydrated input is returned unchanged. Raw ids are looked up; unknown ids
/// are kept with an empty label. Repeated raw ids collapse to their first
/// occurrence.
pub fn normalize(value: &TaxonomyValue, reference: &[TaxonomyItem]) -> TaxonomyValue {
    match value {
        TaxonomyValue::Hydrated(_) => value.clone(),
        TaxonomyValue::Raw(ids) => TaxonomyValue::Hydrated(hydrate_ids(ids, reference)),
    }
}

/// Strips labels, keeping ids in order.
pub fn dehydrate(items: &[TaxonomyItem]) -> Vec<TaxonomyId> {
    items.iter().map(|item| item.id.clone()).collect()
}

/// Normalizes a value for a category and applies its cardinality.
pub fn normalize_attribute(
    category: TaxonomyCategory,
    value: &TaxonomyValue,
    reference: &[TaxonomyItem],
) -> Vec<TaxonomyItem> {
    let items = match value {
        TaxonomyValue::Hydrated(items) => items.clone(),
        TaxonomyValue::Raw(ids) => hydrate_ids(ids, reference),
    };
    enforce_cardinality(category.cardinality(), items)
}

/// Trims a hydrated list to what the cardinality allows.
///
/// Single-select keeps the first item; multi-select drops repeated ids.
pub fn enforce_cardinality(cardinality: Cardinality, items: Vec<TaxonomyItem>) -> Vec<TaxonomyItem> {
    match cardinality {
        Cardinality::Single => items.into_iter().take(1).collect(),
        Cardinality::Multi => {
            let mut seen = HashSet::new();
            items
                .into_iter()
                .filter(|item| seen.insert(item.id.clone()))
                .collect()
        }
    }
}

/// Reads the first non-empty candidate field of a payload.
///
/// Candidates are tried in order and never merged. Unparseable candidates
/// are skipped with a warning so one malformed alias cannot hide a good one.
pub fn resolve_source(payload: &Map<String, Value>, candidates: &[&str]) -> Option<SourcedValue> {
    for &field in candidates {
        let Some(raw) = payload.get(field) else {
            continue;
        };
        match TaxonomyValue::from_json(field, raw) {
            Ok(value) if !value.is_empty() => {
                return Some(SourcedValue {
                    field: field.to_string(),
                    value,
                })
            }
            Ok(_) => continue,
            Err(err) => warn!(field, error = %err, "Skipping malformed taxonomy source"),
        }
    }
    None
}

/// Writes the same bare-id list under every given field name.
pub fn write_dehydrated(payload: &mut Map<String, Value>, names: &[&str], ids: &[TaxonomyId]) {
    let rendered = TaxonomyValue::Raw(ids.to_vec()).to_json();
    for &name in names {
        payload.insert(name.to_string(), rendered.clone());
    }
}

fn hydrate_ids(ids: &[TaxonomyId], reference: &[TaxonomyItem]) -> Vec<TaxonomyItem> {
    let mut labels: HashMap<&TaxonomyId, &str> = HashMap::with_capacity(reference.len());
    for item in reference {
        labels.entry(&item.id).or_insert(item.label.as_str());
    }

    let mut seen = HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(*id))
        .map(|id| match labels.get(id) {
            Some(label) => TaxonomyItem::new(id.clone(), *label),
            None => TaxonomyItem::unlabelled(id.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn basements() -> Vec<TaxonomyItem> {
        vec![
            TaxonomyItem::new(1, "Finished"),
            TaxonomyItem::new(2, "Unfinished"),
            TaxonomyItem::new(3, "Crawl space"),
        ]
    }

    #[test]
    fn normalize_labels_known_ids() {
        let value = TaxonomyValue::Raw(vec![2.into(), 1.into()]);
        assert_eq!(
            normalize(&value, &basements()),
            TaxonomyValue::Hydrated(vec![
                TaxonomyItem::new(2, "Unfinished"),
                TaxonomyItem::new(1, "Finished"),
            ])
        );
    }

    #[test]
    fn string_ids_do_not_match_integer_table() {
        let value = TaxonomyValue::Raw(vec!["1".into()]);
        assert_eq!(
            normalize(&value, &basements()),
            TaxonomyValue::Hydrated(vec![TaxonomyItem::unlabelled("1".into())])
        );
    }

    #[test]
    fn normalize_keeps_unknown_ids_with_empty_label() {
        let value = TaxonomyValue::Raw(vec![99.into()]);
        assert_eq!(
            normalize(&value, &basements()),
            TaxonomyValue::Hydrated(vec![TaxonomyItem::unlabelled(99.into())])
        );
    }

    #[test]
    fn normalize_leaves_hydrated_values_alone() {
        let value = TaxonomyValue::Hydrated(vec![TaxonomyItem::new(1, "Custom label")]);
        assert_eq!(normalize(&value, &basements()), value);
    }

    #[test]
    fn normalize_collapses_repeated_raw_ids() {
        let value = TaxonomyValue::Raw(vec![1.into(), 1.into(), 3.into()]);
        assert_eq!(
            dehydrate(&normalize_attribute(
                TaxonomyCategory::RoomType,
                &value,
                &basements()
            )),
            vec![TaxonomyId::Int(1), TaxonomyId::Int(3)]
        );
    }

    #[test]
    fn normalize_attribute_single_select_keeps_first() {
        let value = TaxonomyValue::Hydrated(vec![
            TaxonomyItem::new(1, "Finished"),
            TaxonomyItem::new(2, "Unfinished"),
        ]);
        let items = normalize_attribute(TaxonomyCategory::BasementType, &value, &basements());
        assert_eq!(items, vec![TaxonomyItem::new(1, "Finished")]);
    }

    #[test]
    fn normalize_attribute_multi_select_drops_duplicate_hydrated_ids() {
        let value = TaxonomyValue::Hydrated(vec![
            TaxonomyItem::new(1, "A"),
            TaxonomyItem::new(1, "A again"),
        ]);
        let items = normalize_attribute(TaxonomyCategory::Amenity, &value, &[]);
        assert_eq!(items, vec![TaxonomyItem::new(1, "A")]);
    }

    #[test]
    fn resolve_source_prefers_first_non_empty_candidate() {
        let payload = json!({
            "basementType": [],
            "basement_type_id": [2],
            "basement_types": [{"id": 3, "label": "Crawl space"}],
        });
        let payload = payload.as_object().unwrap();

        let sourced = resolve_source(
            payload,
            &["basementType", "basement_type_id", "basement_types"],
        )
        .unwrap();

        assert_eq!(sourced.field, "basement_type_id");
        assert_eq!(sourced.value, TaxonomyValue::Raw(vec![2.into()]));
    }

    #[test]
    fn resolve_source_never_merges_candidates() {
        let payload = json!({"roomTypes": [1], "room_type_ids": [2]});
        let sourced = resolve_source(payload.as_object().unwrap(), &["roomTypes", "room_type_ids"])
            .unwrap();
        assert_eq!(sourced.value.ids(), vec![TaxonomyId::Int(1)]);
    }

    #[test]
    fn resolve_source_skips_malformed_candidate() {
        let payload = json!({"roomTypes": true, "room_type_ids": [2]});
        let sourced = resolve_source(payload.as_object().unwrap(), &["roomTypes", "room_type_ids"])
            .unwrap();
        assert_eq!(sourced.field, "room_type_ids");
    }

    #[test]
    fn resolve_source_returns_none_when_all_empty() {
        let payload = json!({"roomTypes": null});
        assert!(resolve_source(payload.as_object().unwrap(), &["roomTypes", "room_type_ids"]).is_none());
    }

    #[test]
    fn write_dehydrated_fills_every_name() {
        let mut payload = Map::new();
        write_dehydrated(
            &mut payload,
            &["roomTypes", "room_type_ids"],
            &[1.into(), "den".into()],
        );
        assert_eq!(payload.get("roomTypes"), Some(&json!([1, "den"])));
        assert_eq!(payload.get("room_type_ids"), Some(&json!([1, "den"])));
    }

    fn arb_id() -> impl Strategy<Value = TaxonomyId> {
        prop_oneof![
            (0i64..50).prop_map(TaxonomyId::Int),
            "[a-z]{1,4}".prop_map(TaxonomyId::Text),
        ]
    }

    fn arb_value() -> impl Strategy<Value = TaxonomyValue> {
        prop_oneof![
            prop::collection::vec(arb_id(), 0..8).prop_map(TaxonomyValue::Raw),
            prop::collection::vec((arb_id(), "[A-Za-z ]{0,8}"), 0..8).prop_map(|pairs| {
                TaxonomyValue::Hydrated(
                    pairs
                        .into_iter()
                        .map(|(id, label)| TaxonomyItem::new(id, label))
                        .collect(),
                )
            }),
        ]
    }

    fn reference_table() -> Vec<TaxonomyItem> {
        (0i64..25)
            .map(|n| TaxonomyItem::new(n, format!("Item {}", n)))
            .collect()
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(value in arb_value()) {
            let reference = reference_table();
            let once = normalize(&value, &reference);
            let twice = normalize(&once, &reference);
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn normalize_never_drops_ids(ids in prop::collection::vec(arb_id(), 0..8)) {
            let hydrated = normalize(&TaxonomyValue::Raw(ids.clone()), &reference_table());
            let kept: HashSet<_> = hydrated.ids().into_iter().collect();
            for id in &ids {
                prop_assert!(kept.contains(id));
            }
        }

        #[test]
        fn dehydrate_inverts_normalize_for_known_ids(
            picks in prop::collection::btree_set(0i64..25, 0..10)
        ) {
            let raw: Vec<TaxonomyId> = picks.into_iter().map(TaxonomyId::Int).collect();
            let hydrated = normalize(&TaxonomyValue::Raw(raw.clone()), &reference_table());
            let TaxonomyValue::Hydrated(items) = hydrated else {
                panic!("normalize must hydrate raw input");
            };
            prop_assert_eq!(dehydrate(&items), raw);
        }
    }
}
