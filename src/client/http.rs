//! Shared HTTP plumbing for the transfer proxy and the JSON-RPC endpoint.

use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::domain::SeerError;

// ============================================================================
// Constants
// ============================================================================

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Idle connections kept per host
const POOL_MAX_IDLE_PER_HOST: usize = 4;

// ============================================================================
// Configuration
// ============================================================================

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Request timeout
    pub timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl HttpConfig {
    /// Create config with custom timeout
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Base HTTP client wrapper
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    config: HttpConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration.
    ///
    /// # Errors
    ///
    /// Returns `SeerError::ClientInit` if the TLS backend cannot be set up.
    pub fn with_config(config: HttpConfig) -> Result<Self, SeerError> {
        let inner = Client::builder()
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .pool_idle_timeout(Duration::from_secs(30))
            .timeout(config.timeout)
            .build()
            .map_err(|e| SeerError::client_init(e.to_string()))?;
        Ok(Self { inner, config })
    }

    /// Build a GET request with standard headers
    pub fn get(&self, url: &str) -> reqwest::RequestBuilder {
        self.inner
            .get(url)
            .header("accept", "application/json")
            .timeout(self.config.timeout)
    }

    /// Build a POST request carrying a JSON body
    pub fn post_json(&self, url: &str, body: &Value) -> reqwest::RequestBuilder {
        self.inner
            .post(url)
            .header("accept", "application/json")
            .json(body)
            .timeout(self.config.timeout)
    }
}

// ============================================================================
// Response Handling
// ============================================================================

/// Reads a JSON body, turning non-2xx statuses into `SeerError::Upstream`.
///
/// # Errors
///
/// Returns an upstream error carrying the body's `message`/`error` field for
/// failed statuses, a network error if the body cannot be read, or a parse
/// error for malformed JSON.
pub async fn read_json(response: Response) -> Result<Value, SeerError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        debug!(status = status.as_u16(), "upstream returned failure status");
        let message = serde_json::from_str::<Value>(&text)
            .ok()
            .as_ref()
            .and_then(upstream_message);
        return Err(SeerError::upstream(status.as_u16(), message));
    }

    serde_json::from_str(&text).map_err(|e| SeerError::parse(e.to_string()))
}

/// Extracts a human-readable message from an error body.
#[must_use]
pub fn upstream_message(body: &Value) -> Option<String> {
    ["message", "error"]
        .iter()
        .find_map(|key| body.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

// ============================================================================
// Tests
// ============================================================================
