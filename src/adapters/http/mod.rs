//! HTTP Adapters
//!
//! reqwest implementations of the listing and reference-data gateways.
//!
//! ```ignore
//! let backend = HttpBackend::new(HttpGatewayConfig::new("https://api.example.com"))?;
//! let listings = HttpListingGateway::with_backend(backend.clone());
//! let reference = HttpReferenceDataGateway::with_backend(backend);
//! ```

mod client;
mod http_listing_gateway;
mod http_reference_data_gateway;

pub use client::{HttpBackend, HttpGatewayConfig};
pub use http_listing_gateway::HttpListingGateway;
pub use http_reference_data_gateway::HttpReferenceDataGateway;
