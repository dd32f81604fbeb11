//! Listing Gateway Port - Interface to the listing backend.
//!
//! The gateway fetches the canonical listing and accepts per-section
//! upserts. Payloads cross this seam as JSON objects; the domain parses
//! them with `RemoteListing::parse`.

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::foundation::ListingId;
use crate::domain::listing::{UpsertPayload, UpsertReceipt};

/// Errors returned by the listing and reference-data backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Rejected by backend ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl GatewayError {
    /// Whether retrying the same call could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            GatewayError::Transport(_) => true,
            GatewayError::Rejected { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

/// Port for reading and writing the canonical listing.
#[async_trait]
pub trait ListingGateway: Send + Sync {
    /// Fetch the canonical listing as a raw JSON object.
    ///
    /// # Errors
    /// Returns `GatewayError::NotFound` if the listing does not exist.
    async fn fetch(&self, id: &ListingId) -> Result<Map<String, Value>, GatewayError>;

    /// Create or update a listing with one section's fields.
    ///
    /// A payload without an id creates the listing; the receipt carries
    /// the id the backend assigned.
    async fn upsert(&self, payload: &UpsertPayload) -> Result<UpsertReceipt, GatewayError>;
}
