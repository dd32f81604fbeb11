//! Wizard module - step sequence and lifecycle status.

mod status;
mod step;

pub use status::WizardStatus;
pub use step::{StepSignal, WizardSequence, WizardStep};
