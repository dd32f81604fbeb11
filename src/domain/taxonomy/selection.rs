//! Selection Controller - per-category cardinality enforcement.
//!
//! Forms never decide themselves whether a click replaces or toggles a
//! choice; they call [`SelectionController::toggle`] and the category's
//! cardinality decides.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use super::{
    normalize_attribute, Cardinality, TaxonomyCategory, TaxonomyId, TaxonomyItem, TaxonomyValue,
};
use crate::domain::listing::{fields, ListingDraft, Section, SectionPayload};

/// Current selections, per category, in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionController {
    selections: BTreeMap<TaxonomyCategory, Vec<TaxonomyId>>,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds selections from the taxonomy attributes of a draft.
    pub fn from_draft(draft: &ListingDraft) -> Self {
        let mut controller = Self::new();
        for binding in fields::taxonomy_bindings() {
            if let (Some(category), Some(sourced)) = (binding.category(), draft.taxonomy(binding)) {
                controller.set(category, &sourced.value);
            }
        }
        controller
    }

    /// Replaces a category's selection, honouring its cardinality.
    pub fn set(&mut self, category: TaxonomyCategory, value: &TaxonomyValue) {
        let mut ids = Vec::new();
        for id in value.ids() {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        if category.cardinality() == Cardinality::Single {
            ids.truncate(1);
        }
        self.selections.insert(category, ids);
    }

    /// Applies a user click on an item.
    ///
    /// Single-select categories always end up holding exactly the clicked
    /// item. Multi-select categories add or remove it.
    pub fn toggle(&mut self, category: TaxonomyCategory, item: &TaxonomyItem) {
        self.toggle_id(category, item.id.clone());
    }

    /// Same as [`toggle`](Self::toggle), by id.
    pub fn toggle_id(&mut self, category: TaxonomyCategory, id: TaxonomyId) {
        let selected = self.selections.entry(category).or_default();
        match category.cardinality() {
            Cardinality::Single => {
                selected.clear();
                selected.push(id);
            }
            Cardinality::Multi => {
                if let Some(pos) = selected.iter().position(|s| *s == id) {
                    selected.remove(pos);
                } else {
                    selected.push(id);
                }
            }
        }
    }

    /// Membership test.
    pub fn is_selected(&self, category: TaxonomyCategory, id: &TaxonomyId) -> bool {
        self.selections
            .get(&category)
            .is_some_and(|ids| ids.contains(id))
    }

    /// Selected ids of a category, in selection order.
    pub fn selected(&self, category: TaxonomyCategory) -> &[TaxonomyId] {
        self.selections
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Clears one category.
    pub fn clear(&mut self, category: TaxonomyCategory) {
        self.selections.remove(&category);
    }

    /// Renders the section's taxonomy attributes as hydrated lists.
    ///
    /// Categories without a selection are emitted as empty lists so a
    /// submit clears them. Categories missing from `references` yield
    /// items with empty labels.
    pub fn to_section_payload(
        &self,
        section: Section,
        references: &HashMap<TaxonomyCategory, Vec<TaxonomyItem>>,
    ) -> SectionPayload {
        let mut payload = SectionPayload::new();
        for binding in fields::section_bindings(section) {
            let Some(category) = binding.category() else {
                continue;
            };
            let reference = references.get(&category).map(Vec::as_slice).unwrap_or_default();
            let value = TaxonomyValue::Raw(self.selected(category).to_vec());
            let items = normalize_attribute(category, &value, reference);
            payload.insert(
                binding.field.to_string(),
                serde_json::to_value(items).unwrap_or(Value::Array(Vec::new())),
            );
        }
        payload
    }
}
