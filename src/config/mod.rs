//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `LISTING_WIZARD` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use listing_wizard::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! let store = config.build_draft_store();
//! ```

mod draft_store;
mod error;
mod gateway;
mod logging;

pub use draft_store::{DraftStoreBackend, DraftStoreConfig};
pub use error::{ConfigError, ValidationError};
pub use gateway::GatewayConfig;
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;
use std::sync::Arc;

use crate::adapters::http::{HttpBackend, HttpListingGateway, HttpReferenceDataGateway};
use crate::application::{ReferenceDataCache, WizardServices};
use crate::ports::{DraftStore, GatewayError};

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Listing backend (base URL, token, retries)
    pub gateway: GatewayConfig,

    /// Where drafts are staged between reloads
    #[serde(default)]
    pub draft_store: DraftStoreConfig,

    /// Log filter and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `LISTING_WIZARD` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `LISTING_WIZARD__GATEWAY__BASE_URL=https://...` -> `gateway.base_url`
    /// - `LISTING_WIZARD__DRAFT_STORE__BACKEND=memory` -> `draft_store.backend`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LISTING_WIZARD")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gateway.validate()?;
        self.draft_store.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Build the configured draft store adapter
    pub fn build_draft_store(&self) -> Arc<dyn DraftStore> {
        self.draft_store.build()
    }

    /// Wire the HTTP gateways, reference cache and draft store together.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError::Transport` if the HTTP client cannot be built.
    pub fn build_services(&self) -> Result<WizardServices, GatewayError> {
        let backend = HttpBackend::new(self.gateway.to_http_config())?;
        let reference = HttpReferenceDataGateway::with_backend(backend.clone());
        let listings = HttpListingGateway::with_backend(backend);

        Ok(WizardServices::new(
            Arc::new(ReferenceDataCache::new(Arc::new(reference))),
            self.build_draft_store(),
            Arc::new(listings),
        ))
    }
}
