//! Coin metadata resolution.
//!
//! Coin types on Sui are colon-delimited (`package::module::Symbol`). Display
//! decimals come from an exact-type override table, then a symbol table keyed
//! by the lowercased third segment, then the chain default of 9.

// ============================================================================
// Constants
// ============================================================================

/// Decimals used when neither override table knows the coin.
pub const DEFAULT_DECIMALS: u32 = 9;

/// Exact coin type overrides (most precise).
const DECIMALS_BY_TYPE: &[(&str, u32)] = &[("0x2::sui::SUI", 9)];

/// Fallback by lowercased symbol. Common 6-decimal stablecoins.
const DECIMALS_BY_SYMBOL: &[(&str, u32)] = &[("usdc", 6), ("usdt", 6), ("usd", 6), ("wusdc", 6)];

// ============================================================================
// Resolution
// ============================================================================

/// Returns the lowercased display symbol of a coin type.
///
/// Uses the third `::` segment when present and non-empty, otherwise the
/// whole string.
#[must_use]
pub fn symbol_of(coin_type: &str) -> String {
    raw_symbol(coin_type)
        .unwrap_or(coin_type)
        .to_lowercase()
}

/// Returns the third `::` segment of a coin type with its original case.
#[must_use]
pub fn raw_symbol(coin_type: &str) -> Option<&str> {
    coin_type.split("::").nth(2).filter(|s| !s.is_empty())
}

/// Returns the display decimals for a coin type.
#[must_use]
pub fn decimals_of(coin_type: &str) -> u32 {
    if let Some((_, decimals)) = DECIMALS_BY_TYPE.iter().find(|(t, _)| *t == coin_type) {
        return *decimals;
    }

    let symbol = symbol_of(coin_type);
    DECIMALS_BY_SYMBOL
        .iter()
        .find(|(s, _)| *s == symbol)
        .map_or(DEFAULT_DECIMALS, |(_, decimals)| *decimals)
}

/// Converts a raw on-chain amount into human units (`raw / 10^decimals`).
#[must_use]
pub fn human_amount(raw_amount: u128, coin_type: &str) -> f64 {
    raw_amount as f64 / 10f64.powi(decimals_of(coin_type) as i32)
}

/// Rounds to the nearest integer and groups thousands with commas.
#[must_use]
pub fn format_int(value: f64) -> String {
    let rounded = value.round();
    if !rounded.is_finite() {
        return "0".to_string();
    }

    let negative = rounded < 0.0;
    let digits = format!("{:.0}", rounded.abs());
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative && grouped != "0" {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Formats a raw amount as a whole-number human amount.
#[must_use]
pub fn format_amount(raw_amount: u128, coin_type: &str) -> String {
    format_int(human_amount(raw_amount, coin_type))
}

// ============================================================================
// Tests
// ============================================================================
