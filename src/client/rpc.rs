//! Sui JSON-RPC client for name resolution and event queries.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::debug;

use super::http::{HttpClient, HttpConfig, read_json};
use super::{EventPage, EventSource, NameService};
use crate::domain::SeerError;
use crate::domain::name::first_name;

// ============================================================================
// Constants
// ============================================================================

/// Default public full node.
pub const DEFAULT_RPC_URL: &str = "https://fullnode.mainnet.sui.io:443";

const RESOLVE_NAMES_METHOD: &str = "suix_resolveNameServiceNames";
const QUERY_EVENTS_METHOD: &str = "suix_queryEvents";

// ============================================================================
// Client
// ============================================================================

/// JSON-RPC 2.0 client.
///
/// Name lookups and event queries use separate timeouts, so each gets its own
/// HTTP client.
#[derive(Debug, Clone)]
pub struct SuiRpcClient {
    url: String,
    names: HttpClient,
    events: HttpClient,
}

impl SuiRpcClient {
    /// # Errors
    ///
    /// Returns `SeerError::ClientInit` if an HTTP client fails to initialize.
    pub fn new(
        url: &str,
        name_timeout: Duration,
        event_timeout: Duration,
    ) -> Result<Self, SeerError> {
        Ok(Self {
            url: url.to_string(),
            names: HttpClient::with_config(HttpConfig::with_timeout(name_timeout))?,
            events: HttpClient::with_config(HttpConfig::with_timeout(event_timeout))?,
        })
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    async fn call(&self, http: &HttpClient, method: &str, params: Value) -> Result<Value, SeerError> {
        let body = request_body(method, params);
        let response = http.post_json(&self.url, &body).send().await?;
        let envelope = read_json(response).await?;
        rpc_result(envelope)
    }
}

#[async_trait]
impl NameService for SuiRpcClient {
    async fn resolve_name(&self, address: &str) -> Result<Option<String>, SeerError> {
        let result = self
            .call(
                &self.names,
                RESOLVE_NAMES_METHOD,
                json!([address, Value::Null, Value::Null]),
            )
            .await?;
        let name = first_name(&result);
        debug!(%address, found = name.is_some(), "name lookup finished");
        Ok(name)
    }
}

#[async_trait]
impl EventSource for SuiRpcClient {
    async fn query_events(
        &self,
        sender: &str,
        cursor: Option<Value>,
        limit: usize,
    ) -> Result<EventPage, SeerError> {
        let params = json!([
            { "Sender": sender },
            cursor.unwrap_or(Value::Null),
            limit,
            true
        ]);
        let result = self.call(&self.events, QUERY_EVENTS_METHOD, params).await?;
        Ok(EventPage::from_result(&result))
    }
}

// ============================================================================
// Envelope Helpers
// ============================================================================

/// Builds a JSON-RPC 2.0 request body with a random id.
#[must_use]
pub fn request_body(method: &str, params: Value) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": fastrand::u32(1..),
        "method": method,
        "params": params,
    })
}

/// Unwraps the `result` of a JSON-RPC response.
///
/// # Errors
///
/// Returns `SeerError::Rpc` for an `error` object and a parse error when the
/// envelope carries neither `result` nor `error`.
pub fn rpc_result(mut envelope: Value) -> Result<Value, SeerError> {
    if let Some(error) = envelope.get("error").filter(|e| !e.is_null()) {
        return Err(SeerError::Rpc {
            code: error["code"].as_i64().unwrap_or(0),
            message: error["message"]
                .as_str()
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    match envelope.get_mut("result") {
        Some(result) => Ok(result.take()),
        None => Err(SeerError::parse("JSON-RPC response without result")),
    }
}

// ============================================================================
// Tests
// ============================================================================
