//! Persisted shape of a wizard draft.
//!
//! A flat record keyed by section, each holding that section's
//! last-submitted payload exactly as submitted, plus session metadata.

use serde::{Deserialize, Serialize};

use super::{ListingDraft, Section, SectionPayload};
use crate::domain::foundation::{DraftSessionId, ListingId, Timestamp};
use crate::domain::wizard::WizardStep;

/// Session metadata stored next to the section payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftMeta {
    pub session_id: DraftSessionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<ListingId>,
    #[serde(default)]
    pub step: WizardStep,
    pub updated_at: Timestamp,
}

/// Reload-surviving staging record of a wizard session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub meta: DraftMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amenities: Option<SectionPayload>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<SectionPayload>,
}

impl DraftRecord {
    /// A record for a fresh session.
    pub fn new(session_id: DraftSessionId, listing_id: Option<ListingId>) -> Self {
        Self {
            meta: DraftMeta {
                session_id,
                listing_id,
                step: WizardStep::default(),
                updated_at: Timestamp::now(),
            },
            location: None,
            info: None,
            media: None,
            amenities: None,
            contact: None,
        }
    }

    fn slot(&self, section: Section) -> &Option<SectionPayload> {
        match section {
            Section::Location => &self.location,
            Section::Info => &self.info,
            Section::Media => &self.media,
            Section::Amenities => &self.amenities,
            Section::Contact => &self.contact,
        }
    }

    fn slot_mut(&mut self, section: Section) -> &mut Option<SectionPayload> {
        match section {
            Section::Location => &mut self.location,
            Section::Info => &mut self.info,
            Section::Media => &mut self.media,
            Section::Amenities => &mut self.amenities,
            Section::Contact => &mut self.contact,
        }
    }

    /// The last payload submitted for a section.
    pub fn section(&self, section: Section) -> Option<&SectionPayload> {
        self.slot(section).as_ref()
    }

    /// Replaces a section's payload and bumps `updated_at`.
    pub fn set_section(&mut self, section: Section, payload: SectionPayload) {
        *self.slot_mut(section) = Some(payload);
        self.touch();
    }

    /// Whether any payload was submitted for a section.
    pub fn has_section(&self, section: Section) -> bool {
        self.slot(section).is_some()
    }

    pub fn touch(&mut self) {
        self.meta.updated_at = Timestamp::now();
    }

    /// Rebuilds the draft entity; every stored field counts as user-modified.
    pub fn to_draft(&self) -> ListingDraft {
        let mut draft = match &self.meta.listing_id {
            Some(id) => ListingDraft::for_listing(id.clone()),
            None => ListingDraft::new(),
        };
        for section in Section::ALL {
            if let Some(payload) = self.section(section) {
                draft.merge_section(section, payload);
            }
        }
        draft
    }
}
