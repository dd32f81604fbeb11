//! Application layer - stateful services built on the domain and ports.
//!
//! - `reference_cache` - Shared, deduplicated taxonomy cache
//! - `wizard` - The wizard orchestrator

pub mod reference_cache;
pub mod wizard;

pub use reference_cache::{CacheSnapshot, ReferenceDataCache};
pub use wizard::{
    MountOptions, MountReport, TransitionOutcome, WizardError, WizardOrchestrator, WizardServices,
};
