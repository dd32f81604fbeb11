//! In-memory gateway fakes for tests and local development.

mod in_memory_listing_gateway;
mod static_reference_data_gateway;

pub use in_memory_listing_gateway::InMemoryListingGateway;
pub use static_reference_data_gateway::StaticReferenceDataGateway;
