//! In-memory Listing Gateway for testing.
//!
//! Holds listings in a map, assigns ids on create, and merges upserted
//! fields into the stored object so a later fetch sees them.
//!
//! # Features
//!
//! - Seeded listings
//! - Error injection for fetch and upsert (consumed in order)
//! - Simulated latency
//! - Call tracking for verification

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::ListingId;
use crate::domain::listing::{UpsertPayload, UpsertReceipt};
use crate::ports::{GatewayError, ListingGateway};

#[derive(Debug, Default)]
struct State {
    listings: HashMap<ListingId, Map<String, Value>>,
    fetch_errors: VecDeque<GatewayError>,
    upsert_errors: VecDeque<GatewayError>,
    fetches: Vec<ListingId>,
    upserts: Vec<UpsertPayload>,
    created: u64,
}

/// Fake listing backend.
#[derive(Debug, Clone, Default)]
pub struct InMemoryListingGateway {
    state: Arc<Mutex<State>>,
    delay: Duration,
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryListingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a listing. The object's `id` field is set to `id`.
    pub fn with_listing(self, id: ListingId, mut listing: Map<String, Value>) -> Self {
        listing.insert("id".to_string(), Value::String(id.to_string()));
        lock(&self.state).listings.insert(id, listing);
        self
    }

    /// Queues an error for the next fetch.
    pub fn with_fetch_error(self, error: GatewayError) -> Self {
        self.push_fetch_error(error);
        self
    }

    /// Queues an error for the next upsert.
    pub fn with_upsert_error(self, error: GatewayError) -> Self {
        self.push_upsert_error(error);
        self
    }

    /// Sets simulated latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn push_fetch_error(&self, error: GatewayError) {
        lock(&self.state).fetch_errors.push_back(error);
    }

    pub fn push_upsert_error(&self, error: GatewayError) {
        lock(&self.state).upsert_errors.push_back(error);
    }

    /// The stored listing, as the backend currently sees it.
    pub fn listing(&self, id: &ListingId) -> Option<Map<String, Value>> {
        lock(&self.state).listings.get(id).cloned()
    }

    /// Ids fetched so far, in call order.
    pub fn fetches(&self) -> Vec<ListingId> {
        lock(&self.state).fetches.clone()
    }

    /// Upserts received so far, in call order (failed ones included).
    pub fn upserts(&self) -> Vec<UpsertPayload> {
        lock(&self.state).upserts.clone()
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }
}

#[async_trait]
impl ListingGateway for InMemoryListingGateway {
    async fn fetch(&self, id: &ListingId) -> Result<Map<String, Value>, GatewayError> {
        self.simulate_latency().await;

        let mut state = lock(&self.state);
        state.fetches.push(id.clone());
        if let Some(error) = state.fetch_errors.pop_front() {
            return Err(error);
        }
        state
            .listings
            .get(id)
            .cloned()
            .ok_or_else(|| GatewayError::NotFound(format!("listing {}", id)))
    }

    async fn upsert(&self, payload: &UpsertPayload) -> Result<UpsertReceipt, GatewayError> {
        self.simulate_latency().await;

        let mut state = lock(&self.state);
        state.upserts.push(payload.clone());
        if let Some(error) = state.upsert_errors.pop_front() {
            return Err(error);
        }

        let id = match &payload.id {
            Some(id) => id.clone(),
            None => {
                state.created += 1;
                ListingId::new(format!("listing-{}", state.created))
                    .map_err(|e| GatewayError::Decode(e.to_string()))?
            }
        };

        let listing = state
            .listings
            .entry(id.clone())
            .or_insert_with(|| Map::from_iter([("id".to_string(), Value::String(id.to_string()))]));
        for (key, value) in &payload.fields {
            listing.insert(key.clone(), value.clone());
        }

        Ok(UpsertReceipt { id })
    }
}
