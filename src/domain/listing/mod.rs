//! Listing module - the draft entity and its persisted and wire shapes.

mod draft;
pub mod fields;
mod record;
mod remote;
mod section;
mod upsert;

pub use draft::{ListingDraft, MergeSummary};
pub use fields::{AttributeBinding, AttributeKind};
pub use record::{DraftMeta, DraftRecord};
pub use remote::RemoteListing;
pub use section::{Section, SectionPayload};
pub use upsert::{UpsertPayload, UpsertReceipt};
