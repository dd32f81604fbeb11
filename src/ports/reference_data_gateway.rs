//! Reference Data Gateway Port - Interface to the taxonomy tables.

use std::collections::HashMap;

use async_trait::async_trait;

use super::GatewayError;
use crate::domain::taxonomy::TaxonomyItem;

/// Port for listing reference-data tables by name.
#[async_trait]
pub trait ReferenceDataGateway: Send + Sync {
    /// Fetch the items of each named table.
    ///
    /// The result is keyed by table name. A table missing from the result
    /// is treated by callers as a failure for that table.
    async fn list(&self, tables: &[&str]) -> Result<HashMap<String, Vec<TaxonomyItem>>, GatewayError>;
}
