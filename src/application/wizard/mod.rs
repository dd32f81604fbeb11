//! Wizard Orchestrator - step sequencing, draft persistence and merging.

mod errors;
mod orchestrator;
mod outcome;

pub use errors::WizardError;
pub use orchestrator::{WizardOrchestrator, WizardServices};
pub use outcome::{MountOptions, MountReport, TransitionOutcome};
