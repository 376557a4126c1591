//! Concurrent coin-creator scan.
//!
//! A fixed pool of workers pulls addresses from a shared cursor. Each address
//! pages through the event log of transactions it sent and keeps the coin
//! creation events. A failed page ends that address's pagination; whatever was
//! collected so far is kept.

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::client::EventSource;
use crate::domain::creator::dedup_created;
use crate::domain::{CreatedCoin, CreatorRegistry, normalize_address};

// ============================================================================
// Configuration
// ============================================================================

/// Worker pool and pagination limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Number of concurrent workers.
    pub concurrency: usize,
    /// Maximum event pages fetched per address.
    pub max_pages: usize,
    /// Events requested per page.
    pub page_size: usize,
    /// Pause between two pages of the same address.
    pub page_delay: Duration,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_pages: 8,
            page_size: 50,
            page_delay: Duration::from_millis(10),
        }
    }
}

// ============================================================================
// Events
// ============================================================================

/// Progress reported while a scan runs.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// One address finished. `coins` is empty for non-creators.
    AddressScanned {
        address: String,
        coins: Vec<CreatedCoin>,
        done: usize,
        total: usize,
    },
    /// Every address finished.
    Finished(ScanReport),
}

/// Aggregate result of a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanReport {
    /// Creators found by this scan.
    pub registry: CreatorRegistry,
    /// Number of addresses scanned.
    pub scanned: usize,
}

// ============================================================================
// Scanner
// ============================================================================

/// Creator scan orchestrator.
#[derive(Clone)]
pub struct CreatorScanner {
    source: Arc<dyn EventSource>,
    config: ScanConfig,
}

impl std::fmt::Debug for CreatorScanner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CreatorScanner")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl CreatorScanner {
    #[must_use]
    pub fn new(source: Arc<dyn EventSource>, config: ScanConfig) -> Self {
        Self { source, config }
    }

    /// Scans `addresses`, reporting each address and the final report on
    /// `progress`. The final report is also returned.
    pub async fn scan<M>(&self, addresses: Vec<String>, progress: mpsc::UnboundedSender<M>) -> ScanReport
    where
        M: From<ScanEvent> + Send + 'static,
    {
        let addresses = Arc::new(prepare_addresses(addresses));
        let total = addresses.len();
        let cursor = Arc::new(AtomicUsize::new(0));
        let done = Arc::new(AtomicUsize::new(0));
        info!(total, workers = self.config.concurrency, "creator scan started");

        let mut workers = JoinSet::new();
        for _ in 0..self.config.concurrency.max(1).min(total.max(1)) {
            let addresses = Arc::clone(&addresses);
            let cursor = Arc::clone(&cursor);
            let done = Arc::clone(&done);
            let source = Arc::clone(&self.source);
            let config = self.config;
            let progress = progress.clone();

            workers.spawn(async move {
                let mut found = Vec::new();
                loop {
                    let index = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(address) = addresses.get(index) else {
                        break;
                    };
                    let coins = scan_address(source.as_ref(), address, config).await;
                    let done = done.fetch_add(1, Ordering::SeqCst) + 1;
                    let _ = progress.send(M::from(ScanEvent::AddressScanned {
                        address: address.clone(),
                        coins: coins.clone(),
                        done,
                        total,
                    }));
                    found.push((address.clone(), coins));
                }
                found
            });
        }

        let mut report = ScanReport {
            registry: CreatorRegistry::new(),
            scanned: 0,
        };
        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok(found) => {
                    for (address, coins) in found {
                        report.scanned += 1;
                        report.registry.record(&address, coins);
                    }
                }
                Err(error) => warn!(%error, "creator scan worker failed"),
            }
        }

        info!(
            scanned = report.scanned,
            creators = report.registry.creator_count(),
            "creator scan finished"
        );
        let _ = progress.send(M::from(ScanEvent::Finished(report.clone())));
        report
    }
}

/// Lowercases, trims and deduplicates candidate addresses, keeping first order.
#[must_use]
pub fn prepare_addresses(addresses: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    addresses
        .into_iter()
        .map(|a| normalize_address(&a))
        .filter(|a| !a.is_empty() && seen.insert(a.clone()))
        .collect()
}

/// Collects the coins created by `address`, paging up to the configured limit.
pub async fn scan_address(
    source: &dyn EventSource,
    address: &str,
    config: ScanConfig,
) -> Vec<CreatedCoin> {
    let mut coins = Vec::new();
    let mut cursor = None;

    for page in 0..config.max_pages {
        if page > 0 {
            tokio::time::sleep(config.page_delay).await;
        }
        let result = match source.query_events(address, cursor.take(), config.page_size).await {
            Ok(result) => result,
            Err(error) => {
                debug!(%address, page, %error, "event page failed, stopping address");
                break;
            }
        };
        coins.extend(result.events.iter().filter_map(CreatedCoin::from_event));

        match result.next_cursor {
            Some(next) if result.has_next_page => cursor = Some(next),
            _ => break,
        }
    }

    dedup_created(coins)
}

// ============================================================================
// Tests
// ============================================================================
