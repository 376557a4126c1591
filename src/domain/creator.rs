//! Coin creation detection and the creator registry.
//!
//! A coin creator is an address that emitted a coin creation event. Events are
//! recognised either by the canonical `0x2::coin::CoinCreated<T>` type or by a
//! heuristic on launchpad wrapper events whose names end in a creation verb.

use std::collections::{HashMap, HashSet};

use serde_json::Value;

use super::coin::raw_symbol;

// ============================================================================
// Constants
// ============================================================================

/// Canonical coin creation event type prefix.
pub const COIN_CREATED_PREFIX: &str = "0x2::coin::CoinCreated";

/// Event name suffixes treated as creation-like by the heuristic fallback.
pub const CREATION_NAME_HINTS: &[&str] = &["New", "Create", "Init", "Launch"];

// ============================================================================
// Types
// ============================================================================

/// A coin type created by some address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedCoin {
    /// Full coin type identifier.
    pub coin_type: String,
    /// Symbol segment of the coin type (original case, may be empty).
    pub symbol: String,
    /// Display name (the symbol segment).
    pub name: String,
    /// Digest of the transaction that emitted the event.
    pub tx_digest: Option<String>,
}

impl CreatedCoin {
    /// Builds a created coin record from its type.
    #[must_use]
    pub fn new(coin_type: impl Into<String>, tx_digest: Option<String>) -> Self {
        let coin_type = coin_type.into();
        let symbol = raw_symbol(&coin_type).unwrap_or_default().to_string();
        Self {
            name: symbol.clone(),
            symbol,
            coin_type,
            tx_digest,
        }
    }

    /// Builds a created coin record from an event, if it is a creation event.
    #[must_use]
    pub fn from_event(event: &Value) -> Option<Self> {
        let coin_type = extract_created_coin_type(event)?;
        let digest = event["id"]["txDigest"].as_str().map(String::from);
        Some(Self::new(coin_type, digest))
    }
}

// ============================================================================
// Event Parsing
// ============================================================================

/// Returns the text between the first `<` and the last `>`, if any.
#[must_use]
pub fn parse_generic(type_str: &str) -> Option<&str> {
    let open = type_str.find('<')?;
    let close = type_str.rfind('>')?;
    (close > open + 1).then(|| &type_str[open + 1..close])
}

/// Extracts the created coin type from an event, if it describes a creation.
#[must_use]
pub fn extract_created_coin_type(event: &Value) -> Option<String> {
    let event_type = event["type"].as_str().unwrap_or_default();

    if event_type.starts_with(COIN_CREATED_PREFIX)
        && let Some(coin_type) = parse_generic(event_type)
    {
        return Some(coin_type.to_string());
    }

    let creation_like = CREATION_NAME_HINTS.iter().any(|hint| {
        event_type.ends_with(&format!("::{hint}")) || event_type.contains(&format!("::{hint}<"))
    });
    if !creation_like {
        return None;
    }

    let parsed = &event["parsedJson"];
    let candidates = [
        parsed["name"]["name"].as_str(),
        parsed["name"].as_str(),
        parsed["pos0"]["meme"]["name"].as_str(),
        parsed["coinType"].as_str(),
        parsed["coin_type"].as_str(),
    ];

    candidates
        .into_iter()
        .flatten()
        .find(|candidate| candidate.contains("::"))
        .map(String::from)
}

/// Deduplicates created coins by lowercased coin type, keeping first occurrences.
#[must_use]
pub fn dedup_created(coins: Vec<CreatedCoin>) -> Vec<CreatedCoin> {
    let mut seen = HashSet::new();
    coins
        .into_iter()
        .filter(|c| !c.coin_type.is_empty() && seen.insert(c.coin_type.to_lowercase()))
        .collect()
}

// ============================================================================
// Creator Registry
// ============================================================================

/// Accumulated creator scan results, keyed by lowercased address.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreatorRegistry {
    creators: HashSet<String>,
    coins_by_creator: HashMap<String, Vec<CreatedCoin>>,
}

impl CreatorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `address` created at least one coin.
    #[must_use]
    pub fn is_creator(&self, address: &str) -> bool {
        self.creators.contains(&address.to_lowercase())
    }

    /// Coins created by `address`.
    #[must_use]
    pub fn coins_of(&self, address: &str) -> &[CreatedCoin] {
        self.coins_by_creator
            .get(&address.to_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Records the coins created by an address. Empty lists are ignored.
    pub fn record(&mut self, address: &str, coins: Vec<CreatedCoin>) {
        if coins.is_empty() {
            return;
        }
        let key = address.to_lowercase();
        let entry = self.coins_by_creator.entry(key.clone()).or_default();
        entry.extend(coins);
        *entry = dedup_created(std::mem::take(entry));
        self.creators.insert(key);
    }

    /// Merges another scan's results into this registry.
    pub fn merge(&mut self, other: &CreatorRegistry) {
        for (address, coins) in &other.coins_by_creator {
            self.record(address, coins.clone());
        }
    }

    /// Number of known creators.
    #[must_use]
    pub fn creator_count(&self) -> usize {
        self.creators.len()
    }
}

// ============================================================================
// Tests
// ============================================================================
