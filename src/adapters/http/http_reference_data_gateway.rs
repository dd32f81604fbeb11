//! HTTP Reference Data Gateway - `ReferenceDataGateway` over REST.
//!
//! `GET {base}/reference-data?tables=room_types,amenities` returns an
//! object keyed by table name, each an ordered array of `{id, label}`
//! (or `{id, name}`) items.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

use super::client::{unwrap_envelope, HttpBackend, HttpGatewayConfig};
use crate::domain::taxonomy::TaxonomyItem;
use crate::ports::{GatewayError, ReferenceDataGateway};

/// Reference-data backend client.
#[derive(Debug, Clone)]
pub struct HttpReferenceDataGateway {
    backend: HttpBackend,
}

impl HttpReferenceDataGateway {
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        Ok(Self {
            backend: HttpBackend::new(config)?,
        })
    }

    /// Shares an already-built backend client.
    pub fn with_backend(backend: HttpBackend) -> Self {
        Self { backend }
    }

    fn tables_url(&self) -> String {
        self.backend.config().url("reference-data")
    }
}

/// Decodes the table map, keeping only the requested tables.
fn decode_tables(
    body: Value,
    requested: &[&str],
) -> Result<HashMap<String, Vec<TaxonomyItem>>, GatewayError> {
    let Value::Object(mut tables) = unwrap_envelope(body) else {
        return Err(GatewayError::Decode("expected an object keyed by table".to_string()));
    };

    let mut result = HashMap::new();
    for table in requested {
        let Some(raw) = tables.remove(*table) else {
            continue;
        };
        let items: Vec<TaxonomyItem> = serde_json::from_value(raw)
            .map_err(|e| GatewayError::Decode(format!("table {}: {}", table, e)))?;
        result.insert(table.to_string(), items);
    }
    Ok(result)
}

#[async_trait]
impl ReferenceDataGateway for HttpReferenceDataGateway {
    async fn list(&self, tables: &[&str]) -> Result<HashMap<String, Vec<TaxonomyItem>>, GatewayError> {
        let url = self.tables_url();
        let joined = tables.join(",");
        debug!(tables = %joined, "Fetching reference data");

        let body = self
            .backend
            .send_json("list_reference_data", |client| {
                client.get(url.as_str()).query(&[("tables", joined.as_str())])
            })
            .await?;

        decode_tables(body, tables)
    }
}
