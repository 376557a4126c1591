//! Transfer proxy client.

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::TransferSource;
use super::http::{HttpClient, HttpConfig, read_json};
use crate::domain::{Direction, SeerError, Transfer};

/// Client for the proxy serving `/sent` and `/received` transfer lists.
#[derive(Debug, Clone)]
pub struct TransferClient {
    http: HttpClient,
    base_url: String,
}

impl TransferClient {
    /// Creates a client for `base_url` (trailing slashes are ignored).
    ///
    /// # Errors
    ///
    /// Returns `SeerError::ClientInit` if the HTTP client fails to initialize.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SeerError> {
        Ok(Self {
            http: HttpClient::with_config(HttpConfig::with_timeout(timeout))?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, direction: Direction) -> String {
        let path = match direction {
            Direction::Sent => "sent",
            Direction::Received => "received",
        };
        format!("{}/{}", self.base_url, path)
    }

    async fn fetch_direction(
        &self,
        address: &str,
        direction: Direction,
    ) -> Result<Vec<Transfer>, SeerError> {
        let response = self
            .http
            .get(&self.endpoint(direction))
            .query(&[("address", address)])
            .send()
            .await?;
        let body = read_json(response).await?;
        parse_transfer_list(&body, direction)
    }
}

#[async_trait]
impl TransferSource for TransferClient {
    async fn fetch_transfers(&self, address: &str) -> Result<Vec<Transfer>, SeerError> {
        debug!(%address, "fetching transfers");
        let (sent, received) = tokio::join!(
            self.fetch_direction(address, Direction::Sent),
            self.fetch_direction(address, Direction::Received)
        );
        let (sent, mut received) = (sent?, received?);
        info!(
            %address,
            sent = sent.len(),
            received = received.len(),
            "transfers fetched"
        );
        received.extend(sent);
        Ok(received)
    }
}

/// Parses a transfer list payload, tagging every record with `direction`.
///
/// Records without both endpoints are skipped.
///
/// # Errors
///
/// Returns a parse error if the payload is not a JSON array.
pub fn parse_transfer_list(body: &Value, direction: Direction) -> Result<Vec<Transfer>, SeerError> {
    let items = body
        .as_array()
        .ok_or_else(|| SeerError::parse("API returned invalid data format"))?;
    Ok(items
        .iter()
        .filter_map(|item| Transfer::from_json(item, direction))
        .collect())
}

// ============================================================================
// Tests
// ============================================================================
