//! File-based Draft Store Adapter
//!
//! Stores the draft record as a single YAML file so a wizard session
//! survives a process restart.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::listing::DraftRecord;
use crate::ports::{DraftStore, DraftStoreError};

/// File-based storage for the draft record
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    path: PathBuf,
}

impl FileDraftStore {
    /// Create a store writing to `path`
    ///
    /// # Example
    /// ```ignore
    /// let store = FileDraftStore::new("./data/listing-draft.yaml");
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Ensure the parent directory exists
    async fn ensure_parent(&self) -> Result<(), DraftStoreError> {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)
                .await
                .map_err(|e| DraftStoreError::IoError(e.to_string())),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DraftStore for FileDraftStore {
    async fn load(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&self.path)
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))?;

        let record = serde_yaml::from_str(&yaml)
            .map_err(|e| DraftStoreError::DeserializationFailed(e.to_string()))?;

        Ok(Some(record))
    }

    async fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError> {
        self.ensure_parent().await?;

        let yaml = serde_yaml::to_string(record)
            .map_err(|e| DraftStoreError::SerializationFailed(e.to_string()))?;

        // Stage beside the target, then rename over it
        let staging = self.path.with_extension("yaml.tmp");
        fs::write(&staging, yaml)
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))?;
        fs::rename(&staging, &self.path)
            .await
            .map_err(|e| DraftStoreError::IoError(e.to_string()))?;

        Ok(())
    }

    async fn clear(&self) -> Result<(), DraftStoreError> {
        if self.path.exists() {
            fs::remove_file(&self.path)
                .await
                .map_err(|e| DraftStoreError::IoError(e.to_string()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{DraftSessionId, ListingId};
    use crate::domain::listing::Section;
    use crate::domain::wizard::WizardStep;
    use serde_json::json;
    use tempfile::TempDir;

    fn test_record() -> DraftRecord {
        let mut record = DraftRecord::new(
            DraftSessionId::new(),
            Some(ListingId::new("listing-9").unwrap()),
        );
        record.meta.step = WizardStep::Media;
        record.set_section(
            Section::Info,
            json!({
                "name": "Maple House",
                "sellingPrice": "2,000,000.00",
                "propertyType": [{"id": 3, "label": "Condo"}],
            })
            .as_object()
            .cloned()
            .unwrap(),
        );
        record
    }

    #[tokio::test]
    async fn missing_file_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path().join("draft.yaml"));

        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_and_load_round_trips_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path().join("nested/dir/draft.yaml"));
        let record = test_record();

        store.save(&record).await.unwrap();
        let loaded = store.load().await.unwrap().unwrap();

        assert_eq!(loaded, record);
        assert_eq!(loaded.meta.step, WizardStep::Media);
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path().join("draft.yaml"));

        store.save(&test_record()).await.unwrap();
        let replacement = DraftRecord::new(DraftSessionId::new(), None);
        store.save(&replacement).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(replacement));
    }

    #[tokio::test]
    async fn clear_removes_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileDraftStore::new(temp_dir.path().join("draft.yaml"));

        store.save(&test_record()).await.unwrap();
        store.clear().await.unwrap();

        assert!(!store.path().exists());
        assert!(store.load().await.unwrap().is_none());
        // clearing twice is fine
        store.clear().await.unwrap();
    }

    #[tokio::test]
    async fn corrupt_file_is_a_deserialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("draft.yaml");
        tokio::fs::write(&path, "meta: [unterminated").await.unwrap();
        let store = FileDraftStore::new(&path);

        let result = store.load().await;

        assert!(matches!(result, Err(DraftStoreError::DeserializationFailed(_))));
    }
}
