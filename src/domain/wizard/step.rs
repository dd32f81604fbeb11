//! WizardSequence - ordering of the listing wizard's steps.
//!
//! # Step Order
//!
//! 1. Location → 2. Info → 3. Media → 4. Amenities → 5. Contact
//!
//! ```ignore
//! let next = WizardSequence::next(WizardStep::Info); // Some(Media)
//! let prev = WizardSequence::previous(WizardStep::Info); // Some(Location)
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::listing::Section;

/// One step of the wizard. Each step edits exactly one section.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    #[default]
    Location,
    Info,
    Media,
    Amenities,
    Contact,
}

impl WizardStep {
    /// The section this step submits.
    pub fn section(&self) -> Section {
        match self {
            WizardStep::Location => Section::Location,
            WizardStep::Info => Section::Info,
            WizardStep::Media => Section::Media,
            WizardStep::Amenities => Section::Amenities,
            WizardStep::Contact => Section::Contact,
        }
    }

    /// The step that submits `section`.
    pub fn for_section(section: Section) -> Self {
        match section {
            Section::Location => WizardStep::Location,
            Section::Info => WizardStep::Info,
            Section::Media => WizardStep::Media,
            Section::Amenities => WizardStep::Amenities,
            Section::Contact => WizardStep::Contact,
        }
    }
}

/// What the caller should do with its step index after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepSignal {
    /// Stay on the current step.
    Stay,
    /// Move forward to the given step.
    Advance(WizardStep),
    /// Move back to the given step.
    Regress(WizardStep),
    /// The last step was submitted; the wizard can be completed.
    Finished,
}

/// Central location for step ordering.
pub struct WizardSequence;

impl WizardSequence {
    /// The canonical order of wizard steps.
    pub const ORDER: [WizardStep; 5] = [
        WizardStep::Location,
        WizardStep::Info,
        WizardStep::Media,
        WizardStep::Amenities,
        WizardStep::Contact,
    ];

    pub fn first() -> WizardStep {
        Self::ORDER[0]
    }

    pub fn last() -> WizardStep {
        Self::ORDER[Self::ORDER.len() - 1]
    }

    /// Returns the 0-based index of a step.
    pub fn index(step: WizardStep) -> usize {
        Self::ORDER.iter().position(|&s| s == step).unwrap_or(0)
    }

    /// Returns the next step, or None at the end.
    pub fn next(step: WizardStep) -> Option<WizardStep> {
        Self::ORDER.get(Self::index(step) + 1).copied()
    }

    /// Returns the previous step, or None at the start.
    pub fn previous(step: WizardStep) -> Option<WizardStep> {
        Self::index(step)
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i).copied())
    }

    /// Steps strictly before `step`.
    pub fn before(step: WizardStep) -> &'static [WizardStep] {
        &Self::ORDER[..Self::index(step)]
    }
}
