//! Storage Adapters
//!
//! Implementations of the DraftStore port.
//!
//! ## Available Adapters
//!
//! - **FileDraftStore** - Stores the draft as a YAML file on disk
//! - **InMemoryDraftStore** - Stores the draft in memory (testing/development)

mod file_draft_store;
mod in_memory_draft_store;

pub use file_draft_store::FileDraftStore;
pub use in_memory_draft_store::InMemoryDraftStore;
