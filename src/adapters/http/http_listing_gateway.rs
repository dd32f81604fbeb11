//! HTTP Listing Gateway - `ListingGateway` over the backend's REST API.
//!
//! # Endpoints
//!
//! - `GET  {base}/listings/{id}` - canonical listing
//! - `POST {base}/listings` - create from a partial section
//! - `PATCH {base}/listings/{id}` - update with a partial section

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::{debug, info};

use super::client::{unwrap_envelope, HttpBackend, HttpGatewayConfig};
use crate::domain::foundation::ListingId;
use crate::domain::listing::{UpsertPayload, UpsertReceipt};
use crate::ports::{GatewayError, ListingGateway};

/// Listing backend client.
#[derive(Debug, Clone)]
pub struct HttpListingGateway {
    backend: HttpBackend,
}

impl HttpListingGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            backend: HttpBackend::new(config)?,
        })
    }

    /// Shares an already-built backend client.
    pub fn with_backend(backend: HttpBackend) -> Self {
        Self { backend }
    }

    fn listing_url(&self, id: &ListingId) -> String {
        self.backend.config().url(&format!("listings/{}", id))
    }

    fn collection_url(&self) -> String {
        self.backend.config().url("listings")
    }
}

/// Decodes a fetched listing body into its JSON object.
fn decode_listing(body: Value) -> Result<Map<String, Value>, GatewayError> {
    match unwrap_envelope(body) {
        Value::Object(map) => Ok(map),
        other => Err(GatewayError::Decode(format!(
            "expected listing object, got {}",
            json_kind(&other)
        ))),
    }
}

/// Reads the id out of an upsert response, falling back to the id the
/// request already carried.
fn decode_receipt(body: Value, requested: Option<&ListingId>) -> Result<UpsertReceipt, GatewayError> {
    let body = unwrap_envelope(body);
    let returned = match body.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    match (returned, requested) {
        (Some(raw), _) => ListingId::new(raw)
            .map(|id| UpsertReceipt { id })
            .map_err(|e| GatewayError::Decode(e.to_string())),
        (None, Some(id)) => Ok(UpsertReceipt { id: id.clone() }),
        (None, None) => Err(GatewayError::Decode(
            "create response carried no listing id".to_string(),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
impl ListingGateway for HttpListingGateway {
    async fn fetch(&self, id: &ListingId) -> Result<Map<String, Value>, GatewayError> {
        let url = self.listing_url(id);
        debug!(listing_id = %id, "Fetching listing");

        let body = self
            .backend
            .send_json("fetch_listing", |client| client.get(url.as_str()))
            .await?;

        decode_listing(body)
    }

    async fn upsert(&self, payload: &UpsertPayload) -> Result<UpsertReceipt, GatewayError> {
        let body = payload.to_json();
        let section = payload.section;

        let response = match &payload.id {
            Some(id) => {
                let url = self.listing_url(id);
                debug!(listing_id = %id, %section, "Updating listing");
                self.backend
                    .send_json("update_listing", |client| client.patch(url.as_str()).json(&body))
                    .await?
            }
            None => {
                let url = self.collection_url();
                debug!(%section, "Creating listing");
                self.backend
                    .send_json_once("create_listing", |client| {
                        client.post(url.as_str()).json(&body)
                    })
                    .await?
            }
        };

        let receipt = decode_receipt(response, payload.id.as_ref())?;
        info!(listing_id = %receipt.id, %section, "Listing upserted");
        Ok(receipt)
    }
}
