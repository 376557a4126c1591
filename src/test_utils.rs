//! Shared test fixtures: Mother factories for domain records, in-memory
//! network fakes and a fully wired [`App`] built on top of them.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ratatui::buffer::Buffer;
use serde_json::Value;

use crate::client::{EventPage, EventSource, NameService, TransferSource};
use crate::domain::transfer::SUI_COIN_TYPE;
use crate::domain::{Direction, SeerError, Transfer};
use crate::state::{App, AppConfig, Services, StartupOptions};

pub const USDC_COIN_TYPE: &str = "0xdba::usdc::USDC";

// ============================================================================
// Mother Pattern Factories
// ============================================================================

pub struct TransferMother;

impl TransferMother {
    /// One SUI sent from `from` to `to`.
    #[must_use]
    pub fn sui(from: &str, to: &str, timestamp_ms: i64) -> Transfer {
        Self::coin(from, to, 1_000_000_000, SUI_COIN_TYPE, timestamp_ms)
    }

    #[must_use]
    pub fn coin(from: &str, to: &str, amount: u128, coin: &str, timestamp_ms: i64) -> Transfer {
        Transfer {
            from: from.to_string(),
            to: to.to_string(),
            amount,
            coin: coin.to_string(),
            timestamp_ms,
            digest: Some(format!("{from}-{to}-{timestamp_ms}")),
            direction: Direction::Sent,
        }
    }
}

// ============================================================================
// Network Fakes
// ============================================================================

/// Serves canned transfer lists per address; unknown addresses fail with a
/// 502 upstream error.
#[derive(Default)]
pub struct FakeTransfers {
    pub by_address: HashMap<String, Vec<Transfer>>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeTransfers {
    #[must_use]
    pub fn with(mut self, address: &str, transfers: Vec<Transfer>) -> Self {
        self.by_address.insert(address.to_string(), transfers);
        self
    }
}

#[async_trait]
impl TransferSource for FakeTransfers {
    async fn fetch_transfers(&self, address: &str) -> Result<Vec<Transfer>, SeerError> {
        self.calls
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .push(address.to_string());
        self.by_address
            .get(address)
            .cloned()
            .ok_or_else(|| SeerError::upstream(502, Some("proxy unavailable".to_string())))
    }
}

/// Resolves from a fixed table; everything else has no name.
#[derive(Default)]
pub struct FakeNames {
    pub names: HashMap<String, String>,
}

#[async_trait]
impl NameService for FakeNames {
    async fn resolve_name(&self, address: &str) -> Result<Option<String>, SeerError> {
        Ok(self.names.get(address).cloned())
    }
}

/// Event log with no events.
#[derive(Default)]
pub struct EmptyEvents;

#[async_trait]
impl EventSource for EmptyEvents {
    async fn query_events(
        &self,
        _sender: &str,
        _cursor: Option<Value>,
        _limit: usize,
    ) -> Result<EventPage, SeerError> {
        Ok(EventPage::default())
    }
}

// ============================================================================
// App Fixtures
// ============================================================================

/// Builds an app over `transfers` with no names and no creators.
///
/// Dispatching actions that spawn work needs a tokio runtime.
#[must_use]
pub fn app_with(transfers: FakeTransfers) -> App {
    let services = Services {
        transfers: Arc::new(transfers),
        names: Arc::new(FakeNames::default()),
        events: Arc::new(EmptyEvents),
    };
    App::with_services(AppConfig::default(), services, StartupOptions::default())
}

// ============================================================================
// Rendering
// ============================================================================

/// Flattens a buffer to text, one line per row.
#[must_use]
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    (area.y..area.bottom())
        .map(|y| {
            (area.x..area.right())
                .map(|x| buffer[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
