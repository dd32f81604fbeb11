//! Shared reqwest plumbing for the backend gateways.
//!
//! Both gateways talk to the same backend, so they share one configured
//! `Client`, the bearer token, and the retry loop.

use reqwest::{Client, RequestBuilder, Response};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::ports::GatewayError;

/// Configuration for the HTTP gateways.
#[derive(Debug, Clone)]
pub struct HttpGatewayConfig {
    /// Base URL of the listing backend, without a trailing slash.
    pub base_url: String,
    /// Optional bearer token sent with every request.
    api_token: Option<Secret<String>>,
    /// Request timeout; none by default.
    pub timeout: Option<Duration>,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each attempt.
    pub retry_backoff: Duration,
}

impl HttpGatewayConfig {
    /// Creates a configuration for the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
            timeout: None,
            max_retries: 2,
            retry_backoff: Duration::from_millis(250),
        }
    }

    /// Sets the bearer token.
    pub fn with_api_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Secret::new(token.into()));
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the maximum retry count.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial retry delay.
    pub fn with_retry_backoff(mut self, backoff: Duration) -> Self {
        self.retry_backoff = backoff;
        self
    }

    /// Joins a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn api_token(&self) -> Option<&str> {
        self.api_token.as_ref().map(|t| t.expose_secret().as_str())
    }
}

/// A configured client shared by the gateways.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: HttpGatewayConfig,
    client: Client,
}

impl HttpBackend {
    /// Builds the underlying reqwest client.
    ///
    /// # Errors
    /// Returns `GatewayError::Transport` if the TLS backend cannot start.
    pub fn new(config: HttpGatewayConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    pub fn config(&self) -> &HttpGatewayConfig {
        &self.config
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Sends the request built by `build`, retrying transient failures,
    /// and decodes the JSON body of a successful response.
    ///
    /// Only for idempotent requests.
    pub async fn send_json<F>(&self, what: &str, build: F) -> Result<Value, GatewayError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.send_with_retries(what, build, self.config.max_retries)
            .await
    }

    /// Sends the request exactly once. A lost response to a create must
    /// not be replayed.
    pub async fn send_json_once<F>(&self, what: &str, build: F) -> Result<Value, GatewayError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        self.send_with_retries(what, build, 0).await
    }

    async fn send_with_retries<F>(
        &self,
        what: &str,
        build: F,
        max_retries: u32,
    ) -> Result<Value, GatewayError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut attempt = 0;
        loop {
            let result = match self.send_once(&build).await {
                Ok(response) => Self::read_json(response).await,
                Err(err) => Err(err),
            };

            match result {
                Ok(body) => return Ok(body),
                Err(err) if err.is_retryable() && attempt < max_retries => {
                    let delay = self.config.retry_backoff * (1 << attempt);
                    warn!(what, attempt, error = %err, "Retrying backend call");
                    sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }

    async fn send_once<F>(&self, build: &F) -> Result<Response, GatewayError>
    where
        F: Fn(&Client) -> RequestBuilder,
    {
        let mut request = build(&self.client).header("Accept", "application/json");
        if let Some(token) = self.config.api_token() {
            request = request.bearer_auth(token);
        }

        request.send().await.map_err(|e| {
            if e.is_timeout() {
                GatewayError::Transport(format!("Timed out: {}", e))
            } else if e.is_connect() {
                GatewayError::Transport(format!("Connection failed: {}", e))
            } else {
                GatewayError::Transport(e.to_string())
            }
        })
    }

    async fn read_json(response: Response) -> Result<Value, GatewayError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body));
        }

        debug!(status = status.as_u16(), bytes = body.len(), "Backend responded");
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

/// Maps a non-success status and body to a gateway error.
pub(crate) fn status_error(status: u16, body: &str) -> GatewayError {
    let message = error_message(body);
    match status {
        404 => GatewayError::NotFound(message),
        _ => GatewayError::Rejected { status, message },
    }
}

/// Pulls `error.message` / `message` / `error` out of a JSON error body,
/// falling back to the raw text.
fn error_message(body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();
    let extracted = parsed.as_ref().and_then(|v| {
        v.pointer("/error/message")
            .or_else(|| v.get("message"))
            .or_else(|| v.get("error"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    extracted.unwrap_or_else(|| body.trim().to_string())
}

/// Unwraps a `{"data": ...}` envelope if present.
pub(crate) fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) if map.len() == 1 && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}
