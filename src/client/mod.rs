//! HTTP clients for the transfer proxy and the Sui JSON-RPC endpoint.
//!
//! The rest of the application talks to the network only through the
//! [`TransferSource`], [`NameService`] and [`EventSource`] traits, so workers
//! and the session can be driven by in-memory fakes in tests.
//!
//! # Example
//!
//! ```ignore
//! use crate::client::{SuiRpcClient, TransferClient, TransferSource};
//!
//! let transfers = TransferClient::new("https://proxy.example/transfers", timeout)?;
//! let records = transfers.fetch_transfers("0xabc").await?;
//! ```

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{SeerError, Transfer};

pub mod http;
pub mod rpc;
pub mod transfers;

// ============================================================================
// Re-exports
// ============================================================================

pub use rpc::SuiRpcClient;
pub use transfers::TransferClient;

// ============================================================================
// Collaborator Traits
// ============================================================================

/// Source of a wallet's transfer history.
#[async_trait]
pub trait TransferSource: Send + Sync {
    /// Fetches received and sent transfers of `address`, received first.
    async fn fetch_transfers(&self, address: &str) -> Result<Vec<Transfer>, SeerError>;
}

/// Reverse name lookup.
#[async_trait]
pub trait NameService: Send + Sync {
    /// Resolves `address` to its primary name, `None` when it has none.
    async fn resolve_name(&self, address: &str) -> Result<Option<String>, SeerError>;
}

/// One page of an event log query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPage {
    /// Raw event objects.
    pub events: Vec<Value>,
    /// Whether another page follows.
    pub has_next_page: bool,
    /// Opaque cursor for the next page.
    pub next_cursor: Option<Value>,
}

impl EventPage {
    /// Parses a `suix_queryEvents` result object.
    #[must_use]
    pub fn from_result(result: &Value) -> Self {
        let events = result["data"].as_array().cloned().unwrap_or_default();
        let next_cursor = match &result["nextCursor"] {
            Value::Null => None,
            cursor => Some(cursor.clone()),
        };
        Self {
            events,
            has_next_page: result["hasNextPage"].as_bool().unwrap_or(false),
            next_cursor,
        }
    }
}

/// Event log filtered by sender, newest first.
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fetches one page of events emitted by transactions sent by `sender`.
    async fn query_events(
        &self,
        sender: &str,
        cursor: Option<Value>,
        limit: usize,
    ) -> Result<EventPage, SeerError>;
}

// ============================================================================
// Tests
// ============================================================================
