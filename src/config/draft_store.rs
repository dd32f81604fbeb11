//! Draft store configuration

use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;

use super::error::ValidationError;
use crate::adapters::storage::{FileDraftStore, InMemoryDraftStore};
use crate::ports::DraftStore;

/// Which draft store adapter to use
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DraftStoreBackend {
    /// Process memory; drafts do not survive a restart
    Memory,
    /// YAML file on disk
    #[default]
    File,
}

/// Draft store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DraftStoreConfig {
    #[serde(default)]
    pub backend: DraftStoreBackend,

    /// File path for the `file` backend
    #[serde(default = "default_path")]
    pub path: PathBuf,
}

impl DraftStoreConfig {
    /// Build the configured adapter
    pub fn build(&self) -> Arc<dyn DraftStore> {
        match self.backend {
            DraftStoreBackend::Memory => Arc::new(InMemoryDraftStore::new()),
            DraftStoreBackend::File => Arc::new(FileDraftStore::new(&self.path)),
        }
    }

    /// Validate draft store configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.backend == DraftStoreBackend::File && self.path.as_os_str().is_empty() {
            return Err(ValidationError::MissingDraftPath);
        }
        Ok(())
    }
}

impl Default for DraftStoreConfig {
    fn default() -> Self {
        Self {
            backend: DraftStoreBackend::default(),
            path: default_path(),
        }
    }
}

fn default_path() -> PathBuf {
    PathBuf::from("./data/listing-draft.yaml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_store_defaults() {
        let config = DraftStoreConfig::default();
        assert_eq!(config.backend, DraftStoreBackend::File);
        assert_eq!(config.path, PathBuf::from("./data/listing-draft.yaml"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_file_backend_requires_path() {
        let config = DraftStoreConfig {
            path: PathBuf::new(),
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::MissingDraftPath));
    }

    #[test]
    fn test_memory_backend_ignores_path() {
        let config = DraftStoreConfig {
            backend: DraftStoreBackend::Memory,
            path: PathBuf::new(),
        };
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_build_memory_store_starts_empty() {
        let config = DraftStoreConfig {
            backend: DraftStoreBackend::Memory,
            ..Default::default()
        };
        let store = config.build();
        assert!(store.load().await.unwrap().is_none());
    }
}
