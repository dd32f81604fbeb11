//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the wizard and the outside world. Adapters implement these ports.
//!
//! - `ListingGateway` - Fetch and upsert the canonical listing
//! - `ReferenceDataGateway` - Fetch taxonomy tables by name
//! - `DraftStore` - Persist the staged draft across reloads

mod draft_store;
mod listing_gateway;
mod reference_data_gateway;

pub use draft_store::{DraftStore, DraftStoreError};
pub use listing_gateway::{GatewayError, ListingGateway};
pub use reference_data_gateway::ReferenceDataGateway;
