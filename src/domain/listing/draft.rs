//! The in-progress listing record spanning all wizard steps.

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use tracing::debug;

use super::fields::{binding_for, AttributeBinding};
use super::{RemoteListing, Section, SectionPayload};
use crate::domain::foundation::ListingId;
use crate::domain::taxonomy::{resolve_source, SourcedValue};

/// Which remote fields were taken and which were shadowed by local edits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub applied: Vec<String>,
    pub kept_local: Vec<String>,
    pub ignored: Vec<String>,
}

/// The aggregate draft entity.
///
/// Fields live in the section that owns them. Every field written through
/// [`ListingDraft::merge_section`] counts as user-modified for the rest of
/// the session, which is what shields it from a later remote merge.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingDraft {
    id: Option<ListingId>,
    sections: BTreeMap<Section, SectionPayload>,
    modified: BTreeSet<String>,
}

impl ListingDraft {
    /// An empty draft for a listing that does not exist yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty draft for an existing listing.
    pub fn for_listing(id: ListingId) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn id(&self) -> Option<&ListingId> {
        self.id.as_ref()
    }

    pub fn set_id(&mut self, id: ListingId) {
        self.id = Some(id);
    }

    pub fn section(&self, section: Section) -> Option<&SectionPayload> {
        self.sections.get(&section)
    }

    pub fn sections(&self) -> impl Iterator<Item = (Section, &SectionPayload)> {
        self.sections.iter().map(|(s, p)| (*s, p))
    }

    /// Looks a field up in its owning section, falling back to any section.
    pub fn field(&self, name: &str) -> Option<&Value> {
        if let Some(binding) = binding_for(name) {
            if let Some(value) = self.section(binding.section).and_then(|p| p.get(name)) {
                return Some(value);
            }
        }
        self.sections.values().find_map(|p| p.get(name))
    }

    /// Reads a taxonomy attribute using the binding's local source order.
    pub fn taxonomy(&self, binding: &AttributeBinding) -> Option<SourcedValue> {
        let payload = self.section(binding.section)?;
        resolve_source(payload, &binding.local_sources())
    }

    pub fn is_modified(&self, name: &str) -> bool {
        self.modified.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.sections.values().all(|p| p.is_empty())
    }

    // ───────────────────────────────────────────────────────────────
    // Mutations
    // ───────────────────────────────────────────────────────────────

    /// Merges a step's payload into its section, marking every key modified.
    pub fn merge_section(&mut self, section: Section, payload: &SectionPayload) {
        let target = self.sections.entry(section).or_default();
        for (key, value) in payload {
            target.insert(key.clone(), value.clone());
            self.modified.insert(key.clone());
        }
    }

    /// Returns a copy of this draft with a payload merged in.
    pub fn with_section(&self, section: Section, payload: &SectionPayload) -> Self {
        let mut candidate = self.clone();
        candidate.merge_section(section, payload);
        candidate
    }

    /// Merges a fetched listing, yielding to local edits.
    ///
    /// A remote field is applied only if neither it nor any alias of the
    /// same attribute was modified in this session.
    pub fn merge_remote(&mut self, remote: &RemoteListing) -> MergeSummary {
        let mut summary = MergeSummary::default();

        if self.id.is_none() {
            self.id = remote.id.clone();
        }

        for (name, value) in &remote.scalars {
            let Some(binding) = binding_for(name) else {
                debug!(field = %name, "Ignoring remote field without binding");
                summary.ignored.push(name.clone());
                continue;
            };
            self.apply_remote(binding, value.clone(), &mut summary);
        }

        for (field, value) in &remote.relations {
            let Some(binding) = binding_for(field) else {
                summary.ignored.push(field.to_string());
                continue;
            };
            self.apply_remote(binding, value.to_json(), &mut summary);
        }

        summary
    }

    fn apply_remote(
        &mut self,
        binding: &AttributeBinding,
        value: Value,
        summary: &mut MergeSummary,
    ) {
        if binding.all_names().iter().any(|n| self.modified.contains(*n)) {
            summary.kept_local.push(binding.field.to_string());
            return;
        }
        self.sections
            .entry(binding.section)
            .or_default()
            .insert(binding.field.to_string(), value);
        summary.applied.push(binding.field.to_string());
    }
}
