//! In-Memory Draft Store Adapter
//!
//! Keeps the draft record in process memory. Useful for testing and for
//! hosts that do not need reload survival.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::listing::DraftRecord;
use crate::ports::{DraftStore, DraftStoreError};

/// In-memory storage for the draft record
#[derive(Debug, Clone, Default)]
pub struct InMemoryDraftStore {
    record: Arc<RwLock<Option<DraftRecord>>>,
    fail_saves: Arc<AtomicBool>,
    save_count: Arc<AtomicUsize>,
}

impl InMemoryDraftStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding a record
    pub fn with_record(record: DraftRecord) -> Self {
        Self {
            record: Arc::new(RwLock::new(Some(record))),
            ..Self::default()
        }
    }

    /// Make subsequent saves fail with an IO error (for tests)
    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far
    pub fn save_count(&self) -> usize {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Snapshot of the stored record without going through the port
    pub async fn peek(&self) -> Option<DraftRecord> {
        self.record.read().await.clone()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn load(&self) -> Result<Option<DraftRecord>, DraftStoreError> {
        Ok(self.record.read().await.clone())
    }

    async fn save(&self, record: &DraftRecord) -> Result<(), DraftStoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(DraftStoreError::IoError("simulated save failure".to_string()));
        }
        *self.record.write().await = Some(record.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn clear(&self) -> Result<(), DraftStoreError> {
        *self.record.write().await = None;
        Ok(())
    }
}
