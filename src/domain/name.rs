//! Name service lookups (SuiNS) and the per-session name cache.
//!
//! A cache entry is either absent (never attempted), a permanent miss, or a
//! resolved name. Misses are never retried within a session and entries are
//! never evicted.

use std::collections::HashMap;

use serde_json::Value;

use super::address::{short_address, truncate_name};

// ============================================================================
// Name State
// ============================================================================

/// Lookup state of an address in the [`NameCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameState<'a> {
    /// No lookup has completed for this address.
    Unknown,
    /// A lookup completed without a name (or failed).
    Missing,
    /// The address resolved to a name.
    Resolved(&'a str),
}

// ============================================================================
// Name Cache
// ============================================================================

/// Address to name mapping with negative caching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameCache {
    entries: HashMap<String, Option<String>>,
}

impl NameCache {
    /// Returns the lookup state of `address`.
    #[must_use]
    pub fn state(&self, address: &str) -> NameState<'_> {
        match self.entries.get(address) {
            None => NameState::Unknown,
            Some(None) => NameState::Missing,
            Some(Some(name)) => NameState::Resolved(name),
        }
    }

    /// Returns the resolved name of `address`, if any.
    #[must_use]
    pub fn name(&self, address: &str) -> Option<&str> {
        match self.state(address) {
            NameState::Resolved(name) => Some(name),
            _ => None,
        }
    }

    /// Returns true once a lookup for `address` has completed (hit or miss).
    #[must_use]
    pub fn is_settled(&self, address: &str) -> bool {
        self.entries.contains_key(address)
    }

    /// Records a lookup result. Empty names are stored as misses.
    ///
    /// Returns true if the entry changed.
    pub fn insert(&mut self, address: impl Into<String>, name: Option<String>) -> bool {
        let name = name.filter(|n| !n.is_empty());
        let address = address.into();
        if self.entries.get(&address) == Some(&name) {
            return false;
        }
        self.entries.insert(address, name);
        true
    }

    /// Node label: truncated name when resolved, otherwise the short address.
    #[must_use]
    pub fn label(&self, address: &str) -> String {
        match self.name(address) {
            Some(name) => truncate_name(name),
            None => short_address(address),
        }
    }

    /// Full label: the complete name when resolved, otherwise the full address.
    #[must_use]
    pub fn full_label<'a>(&'a self, address: &'a str) -> &'a str {
        self.name(address).unwrap_or(address)
    }
}

// ============================================================================
// Response Parsing
// ============================================================================

/// Extracts the first name from a name service result.
///
/// Accepts an array of names, or an object whose first array-valued field (in
/// document order) holds them (e.g. `{"data": [...], "hasNextPage": false}`). Entries may be
/// plain strings or objects with a `name` field.
#[must_use]
pub fn first_name(result: &Value) -> Option<String> {
    let names = match result {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.values().find_map(Value::as_array),
        _ => None,
    }?;

    let first = names.first()?;
    let name = match first {
        Value::String(s) => s.as_str(),
        Value::Object(_) => first["name"].as_str().unwrap_or_default(),
        _ => "",
    };
    (!name.is_empty()).then(|| name.to_string())
}

// ============================================================================
// Tests
// ============================================================================
