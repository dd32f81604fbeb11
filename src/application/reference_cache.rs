//! Reference-Data Cache - on-demand, deduplicated taxonomy tables.
//!
//! Each category is fetched through its own gateway call, at most once
//! while pending or resolved. A failed category is left empty, recorded in
//! [`CacheSnapshot::failures`], and is fetched again only through
//! [`ReferenceDataCache::retry_failed`].
//!
//! The cache state lives in a `tokio::sync::watch` channel so callers can
//! wait for a category to leave the pending set instead of polling.
//!
//! ```ignore
//! let cache = Arc::new(ReferenceDataCache::new(gateway));
//! cache.request(&[TaxonomyCategory::RoomType]).await;
//! let rooms = cache.items_when_ready(TaxonomyCategory::RoomType).await;
//! ```

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::taxonomy::{TaxonomyCategory, TaxonomyItem};
use crate::ports::{GatewayError, ReferenceDataGateway};

/// Point-in-time view of the cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CacheSnapshot {
    resolved: HashMap<TaxonomyCategory, Vec<TaxonomyItem>>,
    pending: HashSet<TaxonomyCategory>,
    failed: HashMap<TaxonomyCategory, String>,
}

impl CacheSnapshot {
    /// True while any fetch is outstanding.
    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    pub fn is_pending(&self, category: TaxonomyCategory) -> bool {
        self.pending.contains(&category)
    }

    pub fn is_resolved(&self, category: TaxonomyCategory) -> bool {
        self.resolved.contains_key(&category)
    }

    /// Items of a category in backend order; empty unless resolved.
    pub fn items(&self, category: TaxonomyCategory) -> &[TaxonomyItem] {
        self.resolved.get(&category).map(Vec::as_slice).unwrap_or_default()
    }

    /// Why the last fetch of a category failed.
    pub fn failure(&self, category: TaxonomyCategory) -> Option<&str> {
        self.failed.get(&category).map(String::as_str)
    }

    /// Categories whose last fetch failed.
    pub fn failures(&self) -> Vec<TaxonomyCategory> {
        let mut failed: Vec<_> = self.failed.keys().copied().collect();
        failed.sort();
        failed
    }

    /// Every resolved category with its items.
    pub fn references(&self) -> HashMap<TaxonomyCategory, Vec<TaxonomyItem>> {
        self.resolved.clone()
    }

    fn needs_fetch(&self, category: TaxonomyCategory) -> bool {
        !self.is_pending(category)
            && !self.is_resolved(category)
            && !self.failed.contains_key(&category)
    }
}

/// Shared taxonomy cache.
pub struct ReferenceDataCache {
    gateway: Arc<dyn ReferenceDataGateway>,
    state: watch::Sender<CacheSnapshot>,
}

impl ReferenceDataCache {
    pub fn new(gateway: Arc<dyn ReferenceDataGateway>) -> Self {
        let (state, _) = watch::channel(CacheSnapshot::default());
        Self { gateway, state }
    }

    /// Fetches every category that is not pending, resolved or failed.
    ///
    /// Returns once the fetches started by this call have settled.
    /// Categories another caller is already fetching are not waited on;
    /// use [`items_when_ready`](Self::items_when_ready) for that.
    pub async fn request(&self, categories: &[TaxonomyCategory]) {
        let claimed = self.claim(categories, false);
        if claimed.is_empty() {
            debug!(requested = categories.len(), "Reference data already cached, pending or failed");
            return;
        }
        self.fetch_all(claimed).await;
    }

    /// Re-requests every category whose last fetch failed.
    pub async fn retry_failed(&self) {
        let failed = self.state.borrow().failures();
        let claimed = self.claim(&failed, true);
        if !claimed.is_empty() {
            self.fetch_all(claimed).await;
        }
    }

    async fn fetch_all(&self, claimed: Vec<TaxonomyCategory>) {
        info!(count = claimed.len(), "Fetching reference data");
        join_all(claimed.into_iter().map(|category| self.fetch_one(category))).await;
    }

    /// Moves the categories that need a fetch into the pending set.
    /// With `include_failed`, failed categories are claimed as well.
    fn claim(&self, categories: &[TaxonomyCategory], include_failed: bool) -> Vec<TaxonomyCategory> {
        let mut claimed = Vec::new();
        self.state.send_if_modified(|snapshot| {
            for &category in categories {
                let wanted = snapshot.needs_fetch(category)
                    || (include_failed && snapshot.failed.contains_key(&category));
                if wanted && !claimed.contains(&category) {
                    snapshot.pending.insert(category);
                    snapshot.failed.remove(&category);
                    claimed.push(category);
                }
            }
            !claimed.is_empty()
        });
        claimed
    }

    async fn fetch_one(&self, category: TaxonomyCategory) {
        let table = category.table_name();
        let outcome = match self.gateway.list(&[table]).await {
            Ok(mut tables) => tables
                .remove(table)
                .ok_or_else(|| GatewayError::NotFound(format!("table {}", table))),
            Err(err) => Err(err),
        };

        self.state.send_modify(|snapshot| {
            snapshot.pending.remove(&category);
            match outcome {
                Ok(items) => {
                    debug!(%category, items = items.len(), "Reference data resolved");
                    snapshot.resolved.insert(category, items);
                }
                Err(err) => {
                    warn!(%category, error = %err, "Reference data fetch failed");
                    snapshot.failed.insert(category, err.to_string());
                }
            }
        });
    }

    /// Waits until `category` is no longer pending and returns its items.
    ///
    /// A failed or never-requested category yields an empty list.
    pub async fn items_when_ready(&self, category: TaxonomyCategory) -> Vec<TaxonomyItem> {
        let mut rx = self.state.subscribe();
        let ready = rx.wait_for(|snapshot| !snapshot.is_pending(category)).await;
        match ready {
            Ok(snapshot) => snapshot.items(category).to_vec(),
            Err(_) => Vec::new(),
        }
    }

    /// Waits for each category in turn and returns the ready lists.
    pub async fn references_when_ready(
        &self,
        categories: &[TaxonomyCategory],
    ) -> HashMap<TaxonomyCategory, Vec<TaxonomyItem>> {
        let mut references = HashMap::new();
        for &category in categories {
            references.insert(category, self.items_when_ready(category).await);
        }
        references
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn is_category_loading(&self, category: TaxonomyCategory) -> bool {
        self.state.borrow().is_pending(category)
    }

    pub fn failures(&self) -> Vec<TaxonomyCategory> {
        self.state.borrow().failures()
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> CacheSnapshot {
        self.state.borrow().clone()
    }

    /// Observe state changes.
    pub fn subscribe(&self) -> watch::Receiver<CacheSnapshot> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::StaticReferenceDataGateway;
    use std::time::Duration;

    fn rooms() -> Vec<TaxonomyItem> {
        vec![TaxonomyItem::new(1, "Den"), TaxonomyItem::new(2, "Office")]
    }

    fn amenities() -> Vec<TaxonomyItem> {
        vec![TaxonomyItem::new("pool", "Pool")]
    }

    fn gateway() -> StaticReferenceDataGateway {
        StaticReferenceDataGateway::new()
            .with_table(TaxonomyCategory::RoomType, rooms())
            .with_table(TaxonomyCategory::Amenity, amenities())
    }

    #[tokio::test]
    async fn request_resolves_each_category() {
        let cache = ReferenceDataCache::new(Arc::new(gateway()));

        cache
            .request(&[TaxonomyCategory::RoomType, TaxonomyCategory::Amenity])
            .await;

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.items(TaxonomyCategory::RoomType), rooms().as_slice());
        assert_eq!(snapshot.items(TaxonomyCategory::Amenity), amenities().as_slice());
        assert!(!cache.is_loading());
    }

    #[tokio::test]
    async fn resolved_categories_are_not_refetched() {
        let gateway = gateway();
        let cache = ReferenceDataCache::new(Arc::new(gateway.clone()));

        cache.request(&[TaxonomyCategory::RoomType]).await;
        cache
            .request(&[TaxonomyCategory::RoomType, TaxonomyCategory::RoomType])
            .await;

        assert_eq!(gateway.requests_for(TaxonomyCategory::RoomType), 1);
    }

    #[tokio::test]
    async fn pending_categories_are_not_requested_twice() {
        let gateway = gateway().held();
        let cache = Arc::new(ReferenceDataCache::new(Arc::new(gateway.clone())));

        let first = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.request(&[TaxonomyCategory::RoomType]).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(cache.is_category_loading(TaxonomyCategory::RoomType));

        // Returns immediately: nothing left to claim.
        cache.request(&[TaxonomyCategory::RoomType]).await;

        gateway.open();
        first.await.unwrap();
        assert_eq!(gateway.requests_for(TaxonomyCategory::RoomType), 1);
        assert!(!cache.is_loading());
    }

    #[tokio::test]
    async fn one_failure_does_not_affect_other_categories() {
        let gateway = gateway().with_failure(TaxonomyCategory::Amenity);
        let cache = ReferenceDataCache::new(Arc::new(gateway));

        cache
            .request(&[TaxonomyCategory::RoomType, TaxonomyCategory::Amenity])
            .await;

        let snapshot = cache.snapshot();
        assert!(snapshot.is_resolved(TaxonomyCategory::RoomType));
        assert!(snapshot.items(TaxonomyCategory::Amenity).is_empty());
        assert_eq!(cache.failures(), vec![TaxonomyCategory::Amenity]);
        assert!(snapshot.failure(TaxonomyCategory::Amenity).is_some());
    }

    #[tokio::test]
    async fn failed_category_can_be_retried_explicitly() {
        let gateway = gateway().with_failure(TaxonomyCategory::Amenity);
        let cache = ReferenceDataCache::new(Arc::new(gateway.clone()));
        cache.request(&[TaxonomyCategory::Amenity]).await;

        gateway.set_failing(TaxonomyCategory::Amenity, false);
        cache.retry_failed().await;

        assert!(cache.failures().is_empty());
        assert_eq!(cache.snapshot().items(TaxonomyCategory::Amenity).len(), 1);
        assert_eq!(gateway.requests_for(TaxonomyCategory::Amenity), 2);
    }

    #[tokio::test]
    async fn failed_category_is_not_refetched_by_request() {
        let gateway = gateway().with_failure(TaxonomyCategory::Amenity);
        let cache = ReferenceDataCache::new(Arc::new(gateway.clone()));
        cache.request(&[TaxonomyCategory::Amenity]).await;

        gateway.set_failing(TaxonomyCategory::Amenity, false);
        cache
            .request(&[TaxonomyCategory::Amenity, TaxonomyCategory::RoomType])
            .await;

        assert_eq!(gateway.requests_for(TaxonomyCategory::Amenity), 1);
        assert_eq!(cache.failures(), vec![TaxonomyCategory::Amenity]);
        assert!(cache.snapshot().is_resolved(TaxonomyCategory::RoomType));
    }

    #[tokio::test]
    async fn missing_table_counts_as_failure() {
        let cache = ReferenceDataCache::new(Arc::new(gateway()));

        cache.request(&[TaxonomyCategory::RoofType]).await;

        assert_eq!(cache.failures(), vec![TaxonomyCategory::RoofType]);
    }

    #[tokio::test]
    async fn items_when_ready_waits_for_pending_fetch() {
        let gateway = gateway().held();
        let cache = Arc::new(ReferenceDataCache::new(Arc::new(gateway.clone())));

        let request = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.request(&[TaxonomyCategory::RoomType]).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        let waiter = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.items_when_ready(TaxonomyCategory::RoomType).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(!waiter.is_finished());

        gateway.open();
        assert_eq!(waiter.await.unwrap(), rooms());
        request.await.unwrap();
    }

    #[tokio::test]
    async fn unrequested_category_is_ready_and_empty() {
        let cache = ReferenceDataCache::new(Arc::new(gateway()));
        assert!(cache.items_when_ready(TaxonomyCategory::Appliance).await.is_empty());
    }

    #[tokio::test]
    async fn subscribers_observe_loading_transitions() {
        let gateway = gateway().held();
        let cache = Arc::new(ReferenceDataCache::new(Arc::new(gateway.clone())));
        let mut rx = cache.subscribe();

        let request = {
            let cache = cache.clone();
            tokio::spawn(async move { cache.request(&[TaxonomyCategory::RoomType]).await })
        };

        rx.wait_for(|s| s.is_loading()).await.unwrap();
        gateway.open();
        rx.wait_for(|s| !s.is_loading()).await.unwrap();
        assert!(rx.borrow().is_resolved(TaxonomyCategory::RoomType));
        request.await.unwrap();
    }
}
