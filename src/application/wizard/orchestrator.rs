//! WizardOrchestrator - owns the draft and sequences the wizard's steps.
//!
//! # Lifecycle
//!
//! `New` → `Loading` (edit flow, remote fetch in flight) → `Editing`, or
//! `New` → `Editing` directly for a create flow. Every upsert passes
//! through `Saving` and returns to `Editing`, whether it succeeds or not.
//!
//! Every step submit is merged into the draft and persisted to the draft
//! store before anything is sent to the backend, so a failed upsert never
//! loses input.

use std::sync::Arc;

use futures::join;
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::errors::WizardError;
use super::outcome::{MountOptions, MountReport, TransitionOutcome};
use crate::application::reference_cache::ReferenceDataCache;
use crate::domain::foundation::{DraftSessionId, ListingId, StateMachine};
use crate::domain::listing::fields::{binding_for, bound_categories, section_bindings};
use crate::domain::listing::{
    DraftRecord, ListingDraft, RemoteListing, Section, SectionPayload, UpsertPayload,
};
use crate::domain::taxonomy::{normalize_attribute, SelectionController, TaxonomyValue};
use crate::domain::validation::{validate_section, ValidationReport};
use crate::domain::wizard::{StepSignal, WizardSequence, WizardStatus, WizardStep};
use crate::ports::{DraftStore, GatewayError, ListingGateway};

/// Collaborators injected into the orchestrator.
#[derive(Clone)]
pub struct WizardServices {
    pub reference_data: Arc<ReferenceDataCache>,
    pub store: Arc<dyn DraftStore>,
    pub listings: Arc<dyn ListingGateway>,
}

impl WizardServices {
    pub fn new(
        reference_data: Arc<ReferenceDataCache>,
        store: Arc<dyn DraftStore>,
        listings: Arc<dyn ListingGateway>,
    ) -> Self {
        Self {
            reference_data,
            store,
            listings,
        }
    }
}

/// Single-user wizard state machine.
pub struct WizardOrchestrator {
    services: WizardServices,
    status: WizardStatus,
    step: WizardStep,
    record: DraftRecord,
    draft: ListingDraft,
    last_report: Option<ValidationReport>,
}

impl WizardOrchestrator {
    pub fn new(services: WizardServices) -> Self {
        Self {
            services,
            status: WizardStatus::New,
            step: WizardStep::default(),
            record: DraftRecord::new(DraftSessionId::new(), None),
            draft: ListingDraft::new(),
            last_report: None,
        }
    }

    // ───────────────────────────────────────────────────────────────
    // Accessors
    // ───────────────────────────────────────────────────────────────

    pub fn status(&self) -> WizardStatus {
        self.status
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &ListingDraft {
        &self.draft
    }

    /// The record as last persisted.
    pub fn record(&self) -> &DraftRecord {
        &self.record
    }

    pub fn session_id(&self) -> DraftSessionId {
        self.record.meta.session_id
    }

    pub fn listing_id(&self) -> Option<&ListingId> {
        self.draft.id()
    }

    /// The report of the last failed `next`, cleared by the next success.
    pub fn last_report(&self) -> Option<&ValidationReport> {
        self.last_report.as_ref()
    }

    pub fn reference_data(&self) -> &Arc<ReferenceDataCache> {
        &self.services.reference_data
    }

    /// Selection state seeded from the draft's taxonomy attributes.
    pub fn selections(&self) -> SelectionController {
        SelectionController::from_draft(&self.draft)
    }

    // ───────────────────────────────────────────────────────────────
    // Entry
    // ───────────────────────────────────────────────────────────────

    /// Initializes the wizard.
    ///
    /// A fresh session clears the draft store; a resumed one reloads it.
    /// With a listing id, the remote listing and every bound reference
    /// table are fetched concurrently and merged under local precedence.
    pub async fn mount(&mut self, options: MountOptions) -> Result<MountReport, WizardError> {
        // 1. Reuse the in-memory draft when it already belongs to this listing
        if self.status == WizardStatus::Editing
            && options.listing_id.is_some()
            && self.draft.id() == options.listing_id.as_ref()
        {
            debug!(listing_id = ?options.listing_id, "Reusing in-memory draft");
            return Ok(MountReport {
                listing_id: options.listing_id,
                step: self.step,
                reused: true,
                ..MountReport::default()
            });
        }

        // 2. Restore or reset the draft store
        let record = self.restore_record(&options).await?;
        let restored: Vec<Section> = Section::ALL
            .into_iter()
            .filter(|section| record.has_section(*section))
            .collect();
        self.draft = record.to_draft();
        self.step = record.meta.step;
        self.record = record;
        self.last_report = None;

        let mut report = MountReport {
            restored,
            ..MountReport::default()
        };

        // 3. Fetch remote and reference data, or just reference data
        let categories = bound_categories();
        match options.listing_id {
            Some(id) => {
                if self.draft.id().is_none() {
                    self.draft.set_id(id.clone());
                }
                self.set_status(WizardStatus::Loading)?;
                info!(listing_id = %id, "Loading listing");

                let (_, fetched) = join!(
                    self.services.reference_data.request(&categories),
                    self.services.listings.fetch(&id)
                );
                self.apply_fetch(fetched, &mut report).await;
            }
            None => {
                self.set_status(WizardStatus::Editing)?;
                self.services.reference_data.request(&categories).await;
            }
        }
        self.set_status(WizardStatus::Editing)?;

        // 4. Persist the session metadata
        self.persist().await?;

        report.listing_id = self.draft.id().cloned();
        report.step = self.step;
        info!(
            session_id = %self.session_id(),
            step = ?self.step,
            restored = report.restored.len(),
            degraded = report.is_degraded(),
            "Wizard mounted"
        );
        Ok(report)
    }

    /// Re-fetches the remote listing and merges it under local precedence.
    pub async fn refresh(&mut self) -> Result<MountReport, WizardError> {
        self.ensure_editing()?;
        let id = self.draft.id().cloned().ok_or_else(WizardError::no_listing)?;

        self.set_status(WizardStatus::Loading)?;
        let categories = bound_categories();
        let (_, fetched) = join!(
            self.services.reference_data.request(&categories),
            self.services.listings.fetch(&id)
        );

        let mut report = MountReport::default();
        self.apply_fetch(fetched, &mut report).await;
        self.set_status(WizardStatus::Editing)?;

        report.listing_id = Some(id);
        report.step = self.step;
        Ok(report)
    }

    async fn restore_record(&self, options: &MountOptions) -> Result<DraftRecord, WizardError> {
        let store = &self.services.store;
        let fresh = || DraftRecord::new(DraftSessionId::new(), options.listing_id.clone());

        if !options.resume {
            store.clear().await?;
            return Ok(fresh());
        }

        let stored = match store.load().await {
            Ok(stored) => stored,
            Err(err) => {
                warn!(error = %err, "Discarding unreadable stored draft");
                store.clear().await?;
                None
            }
        };

        match stored {
            Some(record)
                if options.listing_id.is_none()
                    || record.meta.listing_id == options.listing_id =>
            {
                info!(session_id = %record.meta.session_id, "Resuming stored draft");
                Ok(record)
            }
            Some(record) => {
                info!(
                    stored = ?record.meta.listing_id,
                    requested = ?options.listing_id,
                    "Discarding draft stored for another listing"
                );
                store.clear().await?;
                Ok(fresh())
            }
            None => Ok(fresh()),
        }
    }

    async fn apply_fetch(
        &mut self,
        fetched: Result<Map<String, Value>, GatewayError>,
        report: &mut MountReport,
    ) {
        let parsed = fetched.and_then(|object| {
            RemoteListing::parse(object).map_err(|e| GatewayError::Decode(e.to_string()))
        });

        match parsed {
            Ok(remote) => {
                let remote = self.hydrate_relations(remote).await;
                report.merge = self.draft.merge_remote(&remote);
                report.fetched = true;
                info!(
                    applied = report.merge.applied.len(),
                    kept_local = report.merge.kept_local.len(),
                    "Merged remote listing"
                );
            }
            Err(err) => {
                warn!(error = %err, "Listing fetch failed, continuing with stored draft");
                report.fetch_error = Some(err);
            }
        }
    }

    /// Hydrates each relation once its category has left the pending set.
    async fn hydrate_relations(&self, mut remote: RemoteListing) -> RemoteListing {
        for (field, value) in remote.relations.iter_mut() {
            let Some(category) = binding_for(field).and_then(|b| b.category()) else {
                continue;
            };
            let reference = self.services.reference_data.items_when_ready(category).await;
            *value = TaxonomyValue::Hydrated(normalize_attribute(category, value, &reference));
        }
        remote
    }

    // ───────────────────────────────────────────────────────────────
    // Step transitions
    // ───────────────────────────────────────────────────────────────

    /// Merges, persists and upserts a section without validating it.
    pub async fn save_draft(
        &mut self,
        section: Section,
        payload: SectionPayload,
    ) -> Result<TransitionOutcome, WizardError> {
        self.ensure_editing()?;
        self.stage(section, &payload).await?;
        self.upsert(section, &payload).await?;
        Ok(self.outcome(StepSignal::Stay))
    }

    /// Validates a section, then saves it and advances.
    ///
    /// On a validation failure nothing is merged or persisted. On an
    /// upsert failure the input is kept locally but the step does not
    /// change.
    pub async fn next(
        &mut self,
        section: Section,
        payload: SectionPayload,
    ) -> Result<TransitionOutcome, WizardError> {
        self.ensure_editing()?;

        // 1. Validate the candidate draft
        let candidate = self.draft.with_section(section, &payload);
        let report = validate_section(&candidate, section);
        if !report.is_valid() {
            debug!(%section, focus = ?report.focus(), "Step failed validation");
            self.last_report = Some(report.clone());
            return Err(WizardError::Validation(report));
        }
        self.last_report = None;

        // 2. Persist locally, then remotely
        self.stage(section, &payload).await?;
        self.upsert(section, &payload).await?;

        // 3. Advance
        let current = WizardStep::for_section(section);
        let next = WizardSequence::next(current);
        self.step = next.unwrap_or(current);
        self.persist().await?;

        let signal = match next {
            Some(step) => StepSignal::Advance(step),
            None => StepSignal::Finished,
        };
        debug!(signal = ?signal, "Step submitted");
        Ok(self.outcome(signal))
    }

    /// Saves a section locally and steps back. No validation, no upsert.
    pub async fn back(
        &mut self,
        section: Section,
        payload: SectionPayload,
    ) -> Result<TransitionOutcome, WizardError> {
        self.ensure_editing()?;
        self.stage(section, &payload).await?;

        let current = WizardStep::for_section(section);
        let previous = WizardSequence::previous(current);
        self.step = previous.unwrap_or(current);
        self.persist().await?;

        let signal = match previous {
            Some(step) => StepSignal::Regress(step),
            None => StepSignal::Stay,
        };
        Ok(self.outcome(signal))
    }

    /// Finishes the wizard: clears the store and discards the draft.
    pub async fn complete(&mut self) -> Result<(), WizardError> {
        self.services.store.clear().await?;
        info!(listing_id = ?self.draft.id(), "Wizard completed");
        self.reset();
        Ok(())
    }

    /// Abandons the wizard: clears the store and discards the draft.
    pub async fn abandon(&mut self) -> Result<(), WizardError> {
        self.services.store.clear().await?;
        info!(session_id = %self.session_id(), "Wizard abandoned");
        self.reset();
        Ok(())
    }

    // ───────────────────────────────────────────────────────────────
    // Presentation helpers
    // ───────────────────────────────────────────────────────────────

    /// A section with its taxonomy attributes hydrated for display.
    ///
    /// Waits for each category still being fetched. Legacy and remote
    /// aliases are folded into the working field name.
    pub async fn hydrated_section(&self, section: Section) -> SectionPayload {
        let mut payload = self.draft.section(section).cloned().unwrap_or_default();

        for binding in section_bindings(section) {
            let Some(category) = binding.category() else {
                continue;
            };
            let Some(sourced) = self.draft.taxonomy(binding) else {
                continue;
            };
            let reference = self.services.reference_data.items_when_ready(category).await;
            let items = normalize_attribute(category, &sourced.value, &reference);

            for name in binding.all_names() {
                payload.remove(name);
            }
            payload.insert(
                binding.field.to_string(),
                TaxonomyValue::Hydrated(items).to_json(),
            );
        }
        payload
    }

    /// Renders a selection controller's state as a section payload.
    pub async fn selection_payload(
        &self,
        section: Section,
        selections: &SelectionController,
    ) -> SectionPayload {
        let categories: Vec<_> = section_bindings(section)
            .filter_map(|binding| binding.category())
            .collect();
        let references = self
            .services
            .reference_data
            .references_when_ready(&categories)
            .await;
        selections.to_section_payload(section, &references)
    }

    // ───────────────────────────────────────────────────────────────
    // Internals
    // ───────────────────────────────────────────────────────────────

    fn ensure_editing(&self) -> Result<(), WizardError> {
        if self.status == WizardStatus::Editing {
            Ok(())
        } else {
            Err(WizardError::not_mounted())
        }
    }

    fn set_status(&mut self, target: WizardStatus) -> Result<(), WizardError> {
        if self.status != target {
            self.status = self.status.transition_to(target)?;
            debug!(status = ?self.status, "Wizard status changed");
        }
        Ok(())
    }

    /// Merges into the draft, replaces the stored section, then persists.
    async fn stage(&mut self, section: Section, payload: &SectionPayload) -> Result<(), WizardError> {
        self.draft.merge_section(section, payload);
        self.record.set_section(section, payload.clone());

        self.persist().await
    }

    async fn upsert(&mut self, section: Section, payload: &SectionPayload) -> Result<(), WizardError> {
        let request = UpsertPayload::from_section(self.draft.id().cloned(), section, payload);

        self.set_status(WizardStatus::Saving)?;
        let result = self.services.listings.upsert(&request).await;
        self.set_status(WizardStatus::Editing)?;

        match result {
            Ok(receipt) => {
                if self.draft.id().is_none() {
                    info!(listing_id = %receipt.id, "Adopted listing id from backend");
                    self.draft.set_id(receipt.id);
                    self.persist().await?;
                }
                Ok(())
            }
            Err(err) => {
                warn!(%section, error = %err, "Upsert failed, draft kept locally");
                Err(WizardError::Upsert(err))
            }
        }
    }

    async fn persist(&mut self) -> Result<(), WizardError> {
        self.record.meta.listing_id = self.draft.id().cloned();
        self.record.meta.step = self.step;
        self.record.touch();
        self.services.store.save(&self.record).await?;
        Ok(())
    }

    /// Discarding the draft returns to `New` outside the transition table.
    fn reset(&mut self) {
        self.status = WizardStatus::New;
        self.step = WizardStep::default();
        self.record = DraftRecord::new(DraftSessionId::new(), None);
        self.draft = ListingDraft::new();
        self.last_report = None;
    }

    fn outcome(&self, signal: StepSignal) -> TransitionOutcome {
        TransitionOutcome {
            signal,
            step: self.step,
            listing_id: self.draft.id().cloned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryListingGateway, StaticReferenceDataGateway};
    use crate::adapters::storage::InMemoryDraftStore;
    use crate::domain::taxonomy::{TaxonomyCategory, TaxonomyId, TaxonomyItem};
    use serde_json::json;

    struct Fixture {
        store: InMemoryDraftStore,
        listings: InMemoryListingGateway,
        reference: StaticReferenceDataGateway,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: InMemoryDraftStore::new(),
                listings: InMemoryListingGateway::new(),
                reference: StaticReferenceDataGateway::new()
                    .with_table(
                        TaxonomyCategory::PropertyType,
                        vec![TaxonomyItem::new(1, "House"), TaxonomyItem::new(3, "Condo")],
                    )
                    .with_table(
                        TaxonomyCategory::RoomType,
                        vec![TaxonomyItem::new(1, "Den"), TaxonomyItem::new(2, "Office")],
                    ),
            }
        }

        fn wizard(&self) -> WizardOrchestrator {
            let cache = Arc::new(ReferenceDataCache::new(Arc::new(self.reference.clone())));
            WizardOrchestrator::new(WizardServices::new(
                cache,
                Arc::new(self.store.clone()),
                Arc::new(self.listings.clone()),
            ))
        }
    }

    fn payload(value: Value) -> SectionPayload {
        value.as_object().cloned().unwrap()
    }

    fn listing_id(raw: &str) -> ListingId {
        ListingId::new(raw).unwrap()
    }

    fn valid_info() -> SectionPayload {
        payload(json!({"name": "Maple House", "sellingPrice": "2,000,000.00"}))
    }

    #[tokio::test]
    async fn operations_before_mount_are_rejected() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();

        let result = wizard.save_draft(Section::Info, valid_info()).await;

        assert!(matches!(result, Err(WizardError::Navigation(_))));
        assert!(fixture.listings.upserts().is_empty());
    }

    #[tokio::test]
    async fn create_mount_goes_straight_to_editing() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();

        let report = wizard.mount(MountOptions::create()).await.unwrap();

        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert_eq!(wizard.step(), WizardStep::Location);
        assert!(!report.fetched);
        assert!(report.listing_id.is_none());
        assert!(fixture.listings.fetches().is_empty());
        assert!(wizard.reference_data().snapshot().is_resolved(TaxonomyCategory::RoomType));
    }

    #[tokio::test]
    async fn fresh_mount_clears_stored_draft() {
        let fixture = Fixture::new();
        let mut stale = DraftRecord::new(DraftSessionId::new(), None);
        stale.set_section(Section::Info, payload(json!({"name": "Stale"})));
        fixture.store.save(&stale).await.unwrap();
        let mut wizard = fixture.wizard();

        let report = wizard.mount(MountOptions::create()).await.unwrap();

        assert!(report.restored.is_empty());
        assert!(wizard.draft().field("name").is_none());
        let stored = fixture.store.peek().await.unwrap();
        assert_ne!(stored.meta.session_id, stale.meta.session_id);
        assert!(!stored.has_section(Section::Info));
    }

    #[tokio::test]
    async fn edit_mount_fetches_and_hydrates_relations() {
        let fixture = Fixture::new();
        let id = listing_id("l-1");
        let listings = fixture.listings.clone().with_listing(
            id.clone(),
            payload(json!({"name": "Remote", "property_type_id": 3, "room_type_ids": [2, 9]})),
        );
        let mut wizard = Fixture { listings, ..Fixture::new() }.wizard();

        let report = wizard.mount(MountOptions::edit(id.clone())).await.unwrap();

        assert!(report.fetched);
        assert_eq!(report.listing_id, Some(id));
        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert_eq!(wizard.draft().field("name"), Some(&json!("Remote")));
        assert_eq!(
            wizard.draft().field("propertyType"),
            Some(&json!([{"id": 3, "label": "Condo"}]))
        );
        assert_eq!(
            wizard.draft().field("roomTypes"),
            Some(&json!([{"id": 2, "label": "Office"}, {"id": 9, "label": ""}]))
        );
    }

    #[tokio::test]
    async fn fetch_failure_is_reported_but_not_fatal() {
        let fixture = Fixture::new();
        let id = listing_id("l-1");
        fixture
            .listings
            .push_fetch_error(GatewayError::Transport("connection reset".to_string()));
        let mut wizard = fixture.wizard();

        let report = wizard.mount(MountOptions::edit(id.clone())).await.unwrap();

        assert!(report.is_degraded());
        assert!(!report.fetched);
        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert_eq!(wizard.listing_id(), Some(&id));
    }

    #[tokio::test]
    async fn remounting_same_listing_reuses_draft() {
        let fixture = Fixture::new();
        let id = listing_id("l-1");
        let listings = fixture.listings.clone().with_listing(id.clone(), Map::new());
        let fixture = Fixture { listings, ..fixture };
        let mut wizard = fixture.wizard();

        wizard.mount(MountOptions::edit(id.clone())).await.unwrap();
        let report = wizard.mount(MountOptions::edit(id)).await.unwrap();

        assert!(report.reused);
        assert_eq!(fixture.listings.fetches().len(), 1);
    }

    #[tokio::test]
    async fn next_with_invalid_section_does_not_persist_or_advance() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        let saves = fixture.store.save_count();

        let err = wizard
            .next(Section::Info, payload(json!({"name": "Maple"})))
            .await
            .unwrap_err();

        let report = err.report().unwrap();
        assert_eq!(report.focus(), Some("sellingPrice"));
        assert_eq!(wizard.last_report(), Some(report));
        assert_eq!(fixture.store.save_count(), saves);
        assert!(wizard.draft().field("name").is_none());
        assert_eq!(wizard.step(), WizardStep::Location);
        assert!(fixture.listings.upserts().is_empty());
    }

    #[tokio::test]
    async fn next_advances_and_adopts_created_id() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let outcome = wizard.next(Section::Info, valid_info()).await.unwrap();

        assert_eq!(outcome.signal, StepSignal::Advance(WizardStep::Media));
        assert_eq!(outcome.listing_id, Some(listing_id("listing-1")));
        assert_eq!(wizard.step(), WizardStep::Media);
        assert!(wizard.last_report().is_none());

        let stored = fixture.store.peek().await.unwrap();
        assert_eq!(stored.meta.step, WizardStep::Media);
        assert_eq!(stored.meta.listing_id, Some(listing_id("listing-1")));

        // the second save updates the same listing
        wizard
            .save_draft(Section::Media, payload(json!({"videoUrl": "https://v"})))
            .await
            .unwrap();
        let upserts = fixture.listings.upserts();
        assert_eq!(upserts[1].id, Some(listing_id("listing-1")));
    }

    #[tokio::test]
    async fn next_on_last_step_signals_finished() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let outcome = wizard
            .next(Section::Contact, payload(json!({"contactName": "Ana"})))
            .await
            .unwrap();

        assert_eq!(outcome.signal, StepSignal::Finished);
        assert_eq!(outcome.step, WizardStep::Contact);
    }

    #[tokio::test]
    async fn upsert_failure_keeps_input_and_step() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        fixture.listings.push_upsert_error(GatewayError::Rejected {
            status: 500,
            message: "boom".to_string(),
        });

        let err = wizard.next(Section::Info, valid_info()).await.unwrap_err();

        assert!(matches!(err, WizardError::Upsert(_)));
        assert_eq!(wizard.status(), WizardStatus::Editing);
        assert_eq!(wizard.step(), WizardStep::Location);
        assert_eq!(wizard.draft().field("name"), Some(&json!("Maple House")));
        let stored = fixture.store.peek().await.unwrap();
        assert_eq!(stored.section(Section::Info), Some(&valid_info()));
    }

    #[tokio::test]
    async fn malformed_relation_is_not_sent_as_cleared() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        wizard
            .save_draft(Section::Info, payload(json!({"name": "A", "roomTypes": true})))
            .await
            .unwrap();

        let upserts = fixture.listings.upserts();
        assert_eq!(upserts.len(), 1);
        assert_eq!(upserts[0].fields, payload(json!({"name": "A"})));
        assert_eq!(wizard.draft().field("roomTypes"), Some(&json!(true)));
    }

    #[tokio::test]
    async fn back_persists_without_validation_or_upsert() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let outcome = wizard
            .back(Section::Info, payload(json!({"name": ""})))
            .await
            .unwrap();

        assert_eq!(outcome.signal, StepSignal::Regress(WizardStep::Location));
        assert!(fixture.listings.upserts().is_empty());
        let stored = fixture.store.peek().await.unwrap();
        assert_eq!(stored.section(Section::Info), Some(&payload(json!({"name": ""}))));
    }

    #[tokio::test]
    async fn back_on_first_step_stays() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let outcome = wizard.back(Section::Location, Map::new()).await.unwrap();

        assert_eq!(outcome.signal, StepSignal::Stay);
        assert_eq!(outcome.step, WizardStep::Location);
    }

    #[tokio::test]
    async fn stored_section_holds_last_submitted_payload() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        wizard
            .save_draft(Section::Info, payload(json!({"name": "A", "bedrooms": 2})))
            .await
            .unwrap();
        wizard
            .save_draft(Section::Info, payload(json!({"name": "B"})))
            .await
            .unwrap();

        let stored = fixture.store.load_section(Section::Info).await.unwrap();
        assert_eq!(stored, Some(payload(json!({"name": "B"}))));
        assert_eq!(wizard.draft().field("bedrooms"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn store_failure_surfaces_as_store_error() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        fixture.store.set_fail_saves(true);

        let err = wizard.save_draft(Section::Info, valid_info()).await.unwrap_err();

        assert!(matches!(err, WizardError::Store(_)));
        assert_eq!(wizard.status(), WizardStatus::Editing);
    }

    #[tokio::test]
    async fn complete_clears_store_and_resets() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        wizard.save_draft(Section::Info, valid_info()).await.unwrap();

        wizard.complete().await.unwrap();

        assert!(fixture.store.peek().await.is_none());
        assert_eq!(wizard.status(), WizardStatus::New);
        assert!(wizard.draft().is_empty());
        assert!(wizard.listing_id().is_none());
    }

    #[tokio::test]
    async fn abandon_discards_draft() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        let session = wizard.session_id();

        wizard.abandon().await.unwrap();

        assert!(fixture.store.peek().await.is_none());
        assert_ne!(wizard.session_id(), session);
    }

    #[tokio::test]
    async fn refresh_requires_listing_id() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let err = wizard.refresh().await.unwrap_err();

        assert_eq!(err.code(), crate::domain::foundation::ErrorCode::ListingNotFound);
        assert_eq!(wizard.status(), WizardStatus::Editing);
    }

    #[tokio::test]
    async fn refresh_merges_new_remote_fields_under_local_edits() {
        let fixture = Fixture::new();
        let id = listing_id("l-1");
        let listings = fixture
            .listings
            .clone()
            .with_listing(id.clone(), payload(json!({"name": "Remote", "bedrooms": 2})));
        let fixture = Fixture { listings, ..fixture };
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::edit(id.clone())).await.unwrap();
        wizard
            .back(Section::Info, payload(json!({"name": "Mine"})))
            .await
            .unwrap();

        let report = wizard.refresh().await.unwrap();

        assert!(report.fetched);
        assert!(report.merge.kept_local.contains(&"name".to_string()));
        assert_eq!(wizard.draft().field("name"), Some(&json!("Mine")));
        assert_eq!(wizard.draft().field("bedrooms"), Some(&json!(2)));
    }

    #[tokio::test]
    async fn hydrated_section_folds_aliases_and_labels() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();
        wizard
            .back(
                Section::Info,
                payload(json!({"name": "Maple", "property_type_id": [1], "room_type_ids": [2, 2]})),
            )
            .await
            .unwrap();

        let info = wizard.hydrated_section(Section::Info).await;

        assert_eq!(info["propertyType"], json!([{"id": 1, "label": "House"}]));
        assert_eq!(info["roomTypes"], json!([{"id": 2, "label": "Office"}]));
        assert!(!info.contains_key("property_type_id"));
        assert!(!info.contains_key("room_type_ids"));
        assert_eq!(info["name"], json!("Maple"));
    }

    #[tokio::test]
    async fn selection_payload_renders_labels_from_cache() {
        let fixture = Fixture::new();
        let mut wizard = fixture.wizard();
        wizard.mount(MountOptions::create()).await.unwrap();

        let mut selections = wizard.selections();
        selections.toggle_id(TaxonomyCategory::RoomType, TaxonomyId::Int(1));
        selections.toggle_id(TaxonomyCategory::PropertyType, TaxonomyId::Int(3));
        let info = wizard.selection_payload(Section::Info, &selections).await;

        assert_eq!(info["roomTypes"], json!([{"id": 1, "label": "Den"}]));
        assert_eq!(info["propertyType"], json!([{"id": 3, "label": "Condo"}]));
        assert_eq!(info["basementType"], json!([]));
    }
}
