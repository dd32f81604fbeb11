//! Inputs and results of wizard operations.

use crate::domain::foundation::ListingId;
use crate::domain::listing::{MergeSummary, Section};
use crate::domain::wizard::{StepSignal, WizardStep};
use crate::ports::GatewayError;

/// How to enter the wizard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Existing listing to edit; `None` starts a create flow.
    pub listing_id: Option<ListingId>,
    /// Resume the stored draft instead of starting a fresh session.
    pub resume: bool,
}

impl MountOptions {
    /// A fresh create flow.
    pub fn create() -> Self {
        Self::default()
    }

    /// A fresh edit of an existing listing.
    pub fn edit(listing_id: ListingId) -> Self {
        Self {
            listing_id: Some(listing_id),
            resume: false,
        }
    }

    /// Resume whatever the store holds, continuing with `listing_id` if given.
    pub fn resume(listing_id: Option<ListingId>) -> Self {
        Self {
            listing_id,
            resume: true,
        }
    }
}

/// What `mount` and `refresh` did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MountReport {
    pub listing_id: Option<ListingId>,
    pub step: WizardStep,
    /// Sections restored from the draft store.
    pub restored: Vec<Section>,
    /// The in-memory draft already matched; nothing was fetched.
    pub reused: bool,
    /// The remote listing was fetched and merged.
    pub fetched: bool,
    /// Why the remote fetch failed, if it did. The draft is still usable.
    pub fetch_error: Option<GatewayError>,
    pub merge: MergeSummary,
}

impl MountReport {
    /// True if the draft is running without fresh remote data.
    pub fn is_degraded(&self) -> bool {
        self.fetch_error.is_some()
    }
}

/// Result of `save_draft`, `next` and `back`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionOutcome {
    pub signal: StepSignal,
    /// Step the wizard is on afterwards.
    pub step: WizardStep,
    pub listing_id: Option<ListingId>,
}
