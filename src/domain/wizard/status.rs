//! Wizard lifecycle status.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::StateMachine;

/// Top-level state of the wizard orchestrator.
///
/// Step transitions are not states of their own; they leave the wizard in
/// `Editing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum WizardStatus {
    /// No draft loaded yet.
    #[default]
    New,
    /// Remote entity fetch in flight.
    Loading,
    /// Draft populated and editable.
    Editing,
    /// Remote write in flight.
    Saving,
}

impl StateMachine for WizardStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use WizardStatus::{Editing, Loading, New, Saving};
        matches!(
            (self, target),
            (New, Loading) | (New, Editing) | (Loading, Editing) | (Editing, Saving)
                | (Saving, Editing) | (Editing, Loading)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use WizardStatus::{Editing, Loading, New, Saving};
        match self {
            New => vec![Loading, Editing],
            Loading => vec![Editing],
            Editing => vec![Saving, Loading],
            Saving => vec![Editing],
        }
    }
}
