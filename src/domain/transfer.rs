//! Transfer records fetched from the transfer history API.
//!
//! Records are immutable once fetched. The merged transfer set of a session is
//! the deduplicated union of every batch fetched so far, keyed by digest with a
//! `(from, to, amount, timestamp)` fallback for records that carry none.

use std::collections::HashSet;

use serde_json::Value;

use super::address::same_address;

// ============================================================================
// Constants
// ============================================================================

/// Coin type assumed for records that omit one.
pub const SUI_COIN_TYPE: &str = "0x2::sui::SUI";

/// Padding applied on both sides of the automatic time window.
pub const TIME_WINDOW_PADDING_MS: i64 = 1_000;

// ============================================================================
// Types
// ============================================================================

/// Direction of a transfer relative to the address it was fetched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Fetched from the `sent` endpoint: `from` is the queried address.
    Sent,
    /// Fetched from the `received` endpoint: `to` is the queried address.
    Received,
}

/// A single coin transfer between two addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfer {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Raw on-chain amount (before decimal scaling).
    pub amount: u128,
    /// Full coin type identifier.
    pub coin: String,
    /// Unix timestamp in milliseconds.
    pub timestamp_ms: i64,
    /// Transaction digest, when the upstream provided one.
    pub digest: Option<String>,
    /// Which endpoint the record came from.
    pub direction: Direction,
}

/// Identity of a transfer for deduplication.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TransferKey {
    /// Keyed by transaction digest.
    Digest(String),
    /// Keyed by `(from, to, amount, timestamp_ms)`.
    Fields(String, String, u128, i64),
}

impl Transfer {
    /// Parses a transfer record from upstream JSON.
    ///
    /// `amount` and `timestampMs` may be JSON numbers or numeric strings.
    /// Returns `None` when either endpoint address is missing.
    #[must_use]
    pub fn from_json(json: &Value, direction: Direction) -> Option<Self> {
        let from = json["from"].as_str().filter(|s| !s.is_empty())?.to_string();
        let to = json["to"].as_str().filter(|s| !s.is_empty())?.to_string();
        let coin = json["coin"]
            .as_str()
            .or_else(|| json["coinType"].as_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(SUI_COIN_TYPE)
            .to_string();
        let digest = json["digest"]
            .as_str()
            .filter(|s| !s.is_empty())
            .map(String::from);

        Some(Self {
            from,
            to,
            amount: parse_u128(&json["amount"]).unwrap_or(0),
            coin,
            timestamp_ms: parse_i64(&json["timestampMs"]).unwrap_or(0),
            digest,
            direction,
        })
    }

    /// Returns the deduplication key of this record.
    #[must_use]
    pub fn key(&self) -> TransferKey {
        match &self.digest {
            Some(digest) => TransferKey::Digest(digest.clone()),
            None => TransferKey::Fields(
                self.from.clone(),
                self.to.clone(),
                self.amount,
                self.timestamp_ms,
            ),
        }
    }

    /// Returns true if `address` is either endpoint (case-insensitive).
    #[must_use]
    pub fn involves(&self, address: &str) -> bool {
        same_address(&self.from, address) || same_address(&self.to, address)
    }

    /// Returns the other endpoint when `address` is one of them.
    #[must_use]
    pub fn counterparty(&self, address: &str) -> Option<&str> {
        if same_address(&self.from, address) {
            Some(&self.to)
        } else if same_address(&self.to, address) {
            Some(&self.from)
        } else {
            None
        }
    }
}

// ============================================================================
// Set Operations
// ============================================================================

/// Deduplicates transfers, keeping the first occurrence of each key.
#[must_use]
pub fn dedup_transfers<'a, I>(transfers: I) -> Vec<Transfer>
where
    I: IntoIterator<Item = &'a Transfer>,
{
    let mut seen = HashSet::new();
    transfers
        .into_iter()
        .filter(|t| seen.insert(t.key()))
        .cloned()
        .collect()
}

/// Merges a fresh batch into an existing set (existing records win).
#[must_use]
pub fn merge_transfers(existing: &[Transfer], fresh: &[Transfer]) -> Vec<Transfer> {
    dedup_transfers(existing.iter().chain(fresh.iter()))
}

/// Distinct counterparties of `address`, in first-seen order.
#[must_use]
pub fn counterparties(transfers: &[Transfer], address: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    transfers
        .iter()
        .filter_map(|t| t.counterparty(address))
        .filter(|id| seen.insert(id.to_string()))
        .map(String::from)
        .collect()
}

/// Distinct lowercased coin symbols, sorted.
#[must_use]
pub fn coin_symbols(transfers: &[Transfer]) -> Vec<String> {
    let mut symbols: Vec<String> = transfers
        .iter()
        .map(|t| super::coin::symbol_of(&t.coin))
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    symbols.sort();
    symbols
}

/// Time window covering every transfer, padded by one second on each side.
#[must_use]
pub fn padded_time_window(transfers: &[Transfer]) -> Option<(i64, i64)> {
    let min = transfers.iter().map(|t| t.timestamp_ms).min()?;
    let max = transfers.iter().map(|t| t.timestamp_ms).max()?;
    Some((min - TIME_WINDOW_PADDING_MS, max + TIME_WINDOW_PADDING_MS))
}

fn parse_u128(value: &Value) -> Option<u128> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u128)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
