//! Draft Store Port - Interface for the reload-surviving draft record.
//!
//! The store holds at most one record: the draft of the current wizard
//! session. Implementations exist for process memory and a YAML file.

use async_trait::async_trait;

use crate::domain::listing::{DraftRecord, Section, SectionPayload};

/// Errors that can occur during draft storage operations
#[derive(Debug, thiserror::Error)]
pub enum DraftStoreError {
    #[error("Failed to serialize draft: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize draft: {0}")]
    DeserializationFailed(String),

    #[error("IO error: {0}")]
    IoError(String),
}

/// Port for persisting the staged draft between reloads.
#[async_trait]
pub trait DraftStore: Send + Sync {
    /// Load the stored record, if any.
    ///
    /// # Errors
    /// Returns `DraftStoreError::DeserializationFailed` if a record exists
    /// but cannot be read.
    async fn load(&self) -> Result<Option<DraftRecord>, DraftStoreError>;

    /// Replace the stored record.
    async fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError>;

    /// Remove the stored record. Clearing an empty store is not an error.
    async fn clear(&self) -> Result<(), DraftStoreError>;

    /// Load a single section's last-submitted payload.
    async fn load_section(&self, section: Section) -> Result<Option<SectionPayload>, DraftStoreError> {
        Ok(self
            .load()
            .await?
            .and_then(|record| record.section(section).cloned()))
    }
}
