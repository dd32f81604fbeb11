//! Backend gateway configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;
use crate::adapters::http::HttpGatewayConfig;

/// Listing backend configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL of the listing backend
    pub base_url: String,

    /// Bearer token for the backend
    #[serde(default)]
    pub api_token: Option<Secret<String>>,

    /// Request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Retries on transient failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// First retry delay in milliseconds
    #[serde(default = "default_retry_backoff")]
    pub retry_backoff_ms: u64,
}

impl GatewayConfig {
    /// Get timeout as Duration, if one is configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Build the HTTP adapter configuration
    pub fn to_http_config(&self) -> HttpGatewayConfig {
        let mut config = HttpGatewayConfig::new(self.base_url.clone())
            .with_max_retries(self.max_retries)
            .with_retry_backoff(Duration::from_millis(self.retry_backoff_ms));
        if let Some(timeout) = self.timeout() {
            config = config.with_timeout(timeout);
        }

        match &self.api_token {
            Some(token) => config.with_api_token(token.expose_secret().clone()),
            None => config,
        }
    }

    /// Validate gateway configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.base_url.is_empty() {
            return Err(ValidationError::MissingRequired("GATEWAY__BASE_URL"));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(ValidationError::InvalidBaseUrl);
        }
        if matches!(self.timeout_secs, Some(secs) if secs == 0 || secs > 300) {
            return Err(ValidationError::InvalidTimeout);
        }
        if self.max_retries > 10 {
            return Err(ValidationError::TooManyRetries);
        }
        Ok(())
    }
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_token: None,
            timeout_secs: None,
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff(),
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff() -> u64 {
    250
}
