//! Static Reference Data Gateway for testing.
//!
//! Serves fixed tables from memory. Tables can be marked as failing, and
//! responses can be held behind a gate so tests control when a fetch
//! resolves.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;

use crate::domain::taxonomy::{TaxonomyCategory, TaxonomyItem};
use crate::ports::{GatewayError, ReferenceDataGateway};

#[derive(Debug, Default)]
struct State {
    tables: HashMap<String, Vec<TaxonomyItem>>,
    failing: HashSet<String>,
    calls: Vec<Vec<String>>,
}

/// Fake reference-data backend.
#[derive(Debug, Clone)]
pub struct StaticReferenceDataGateway {
    state: Arc<Mutex<State>>,
    gate: Arc<watch::Sender<bool>>,
}

impl Default for StaticReferenceDataGateway {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(state: &Mutex<State>) -> MutexGuard<'_, State> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl StaticReferenceDataGateway {
    /// An open gateway with no tables.
    pub fn new() -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(State::default())),
            gate: Arc::new(gate),
        }
    }

    /// Adds a table for a category.
    pub fn with_table(self, category: TaxonomyCategory, items: Vec<TaxonomyItem>) -> Self {
        lock(&self.state)
            .tables
            .insert(category.table_name().to_string(), items);
        self
    }

    /// Makes every fetch of `category` fail.
    pub fn with_failure(self, category: TaxonomyCategory) -> Self {
        self.set_failing(category, true);
        self
    }

    /// Holds every response until [`open`](Self::open) is called.
    pub fn held(self) -> Self {
        self.gate.send_replace(false);
        self
    }

    /// Releases held responses.
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    pub fn set_failing(&self, category: TaxonomyCategory, failing: bool) {
        let mut state = lock(&self.state);
        let table = category.table_name().to_string();
        if failing {
            state.failing.insert(table);
        } else {
            state.failing.remove(&table);
        }
    }

    /// Table lists requested so far, one entry per call.
    pub fn calls(&self) -> Vec<Vec<String>> {
        lock(&self.state).calls.clone()
    }

    /// How many calls requested `category`.
    pub fn requests_for(&self, category: TaxonomyCategory) -> usize {
        let table = category.table_name();
        lock(&self.state)
            .calls
            .iter()
            .filter(|call| call.iter().any(|t| t == table))
            .count()
    }

    async fn wait_for_gate(&self) {
        let mut rx = self.gate.subscribe();
        // A closed channel means the gateway is being dropped; just proceed.
        let _ = rx.wait_for(|open| *open).await;
    }
}

#[async_trait]
impl ReferenceDataGateway for StaticReferenceDataGateway {
    async fn list(&self, tables: &[&str]) -> Result<HashMap<String, Vec<TaxonomyItem>>, GatewayError> {
        lock(&self.state)
            .calls
            .push(tables.iter().map(|t| t.to_string()).collect());

        self.wait_for_gate().await;

        let state = lock(&self.state);
        if let Some(table) = tables.iter().find(|t| state.failing.contains(**t)) {
            return Err(GatewayError::Rejected {
                status: 503,
                message: format!("table {} unavailable", table),
            });
        }

        Ok(tables
            .iter()
            .filter_map(|t| state.tables.get(*t).map(|items| (t.to_string(), items.clone())))
            .collect())
    }
}
