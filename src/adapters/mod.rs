//! Adapters - Implementations of the port interfaces.
//!
//! - `storage` - Draft store backends (memory, YAML file)
//! - `http` - reqwest gateways to the listing backend
//! - `memory` - In-memory gateway fakes

pub mod http;
pub mod memory;
pub mod storage;
