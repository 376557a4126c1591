//! Transaction filter: time window, global coin filter and per-coin minimums.

use crate::domain::Transfer;
use crate::domain::coin::{human_amount, symbol_of};

// ============================================================================
// Types
// ============================================================================

/// Global filter state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterState {
    /// Lowercased coin symbol, or `None` for all coins.
    pub coin: Option<String>,
    /// Inclusive lower bound in milliseconds, `None` for unbounded.
    pub start: Option<i64>,
    /// Inclusive upper bound in milliseconds, `None` for unbounded.
    pub end: Option<i64>,
}

impl FilterState {
    /// Sets the global coin filter; empty input clears it.
    pub fn set_coin(&mut self, coin: Option<&str>) {
        self.coin = coin
            .map(|c| c.trim().to_lowercase())
            .filter(|c| !c.is_empty());
    }

    /// Returns true if `timestamp_ms` lies within the window.
    #[must_use]
    pub fn in_window(&self, timestamp_ms: i64) -> bool {
        self.start.is_none_or(|start| timestamp_ms >= start)
            && self.end.is_none_or(|end| timestamp_ms <= end)
    }

    /// Returns true if `symbol` passes the global coin filter.
    #[must_use]
    pub fn coin_matches(&self, symbol: &str) -> bool {
        self.coin.as_deref().is_none_or(|coin| coin == symbol)
    }
}

/// Committed per-coin minimum amount rule.
#[derive(Debug, Clone, PartialEq)]
pub struct CoinRule {
    /// Lowercased coin symbol.
    pub coin: String,
    /// Minimum human-scaled amount (inclusive).
    pub min_amount: f64,
}

impl CoinRule {
    #[must_use]
    pub fn new(coin: impl Into<String>, min_amount: f64) -> Self {
        Self {
            coin: coin.into().to_lowercase(),
            min_amount,
        }
    }
}

/// A rule row being edited; not applied until committed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftRule {
    /// Selected coin symbol, empty when none chosen yet.
    pub coin: String,
    /// Minimum amount as typed.
    pub min_amount: String,
}

impl DraftRule {
    /// Converts the draft into a committed rule.
    ///
    /// Drafts without a coin are dropped; unparsable or negative minimums
    /// become zero.
    #[must_use]
    pub fn commit(&self) -> Option<CoinRule> {
        let coin = self.coin.trim();
        if coin.is_empty() {
            return None;
        }
        let min = self
            .min_amount
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|m| m.is_finite())
            .unwrap_or(0.0)
            .max(0.0);
        Some(CoinRule::new(coin, min))
    }
}

/// Commits every complete draft, preserving order.
#[must_use]
pub fn commit_drafts(drafts: &[DraftRule]) -> Vec<CoinRule> {
    drafts.iter().filter_map(DraftRule::commit).collect()
}

// ============================================================================
// Predicate
// ============================================================================

/// Returns true if `transfer` passes the time window, coin filter and rules.
///
/// A rule for the transfer's coin overrides the global coin filter for that
/// coin: only the minimum amount is checked. Coins without a rule fall back
/// to the global coin filter.
#[must_use]
pub fn passes(transfer: &Transfer, filter: &FilterState, rules: &[CoinRule]) -> bool {
    if !filter.in_window(transfer.timestamp_ms) {
        return false;
    }

    let symbol = symbol_of(&transfer.coin);
    if let Some(rule) = rules.iter().find(|r| r.coin == symbol) {
        return human_amount(transfer.amount, &transfer.coin) >= rule.min_amount;
    }
    filter.coin_matches(&symbol)
}

/// Indices of the transfers that pass, in their original order.
#[must_use]
pub fn matching_indices(transfers: &[Transfer], filter: &FilterState, rules: &[CoinRule]) -> Vec<usize> {
    transfers
        .iter()
        .enumerate()
        .filter(|(_, t)| passes(t, filter, rules))
        .map(|(i, _)| i)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Direction;
    use rstest::rstest;

    const USDC: &str = "0xdba::usdc::USDC";
    const SUI: &str = "0x2::sui::SUI";

    fn transfer(coin: &str, amount: u128, ts: i64) -> Transfer {
        Transfer {
            from: "0xa".to_string(),
            to: "0xb".to_string(),
            amount,
            coin: coin.to_string(),
            timestamp_ms: ts,
            digest: None,
            direction: Direction::Sent,
        }
    }

    #[test]
    fn test_no_constraints_pass() {
        let tx = transfer(SUI, 1_000_000_000, 1000);
        assert!(passes(&tx, &FilterState::default(), &[]));
    }

    #[rstest]
    #[case::before(Some(2000), None, false)]
    #[case::at_start(Some(1000), None, true)]
    #[case::after_end(None, Some(999), false)]
    #[case::at_end(None, Some(1000), true)]
    #[case::inside(Some(0), Some(5000), true)]
    fn test_time_window(#[case] start: Option<i64>, #[case] end: Option<i64>, #[case] ok: bool) {
        let filter = FilterState {
            coin: None,
            start,
            end,
        };
        assert_eq!(passes(&transfer(SUI, 1, 1000), &filter, &[]), ok);
    }

    #[rstest]
    #[case::below_min(5_000_000, false)]
    #[case::at_min(10_000_000, true)]
    #[case::above_min(25_000_000, true)]
    fn test_per_coin_minimum(#[case] raw: u128, #[case] ok: bool) {
        let rules = vec![CoinRule::new("usdc", 10.0)];
        assert_eq!(
            passes(&transfer(USDC, raw, 0), &FilterState::default(), &rules),
            ok
        );
    }

    #[test]
    fn test_rule_overrides_global_coin_filter() {
        let mut filter = FilterState::default();
        filter.set_coin(Some("sui"));
        let rules = vec![CoinRule::new("usdc", 10.0)];

        assert!(passes(&transfer(USDC, 10_000_000, 0), &filter, &rules));
        assert!(passes(&transfer(SUI, 1, 0), &filter, &rules));
        assert!(!passes(&transfer("0xm::meme::MEME", 1, 0), &filter, &rules));
    }

    #[test]
    fn test_unmatched_rule_falls_back_to_global() {
        let rules = vec![CoinRule::new("usdc", 10.0)];
        assert!(passes(&transfer(SUI, 1, 0), &FilterState::default(), &rules));

        let mut filter = FilterState::default();
        filter.set_coin(Some("USDC"));
        assert!(!passes(&transfer(SUI, 1, 0), &filter, &[]));
        assert!(passes(&transfer(USDC, 1, 0), &filter, &[]));
    }

    #[test]
    fn test_set_coin_clears_on_empty() {
        let mut filter = FilterState::default();
        filter.set_coin(Some("  "));
        assert_eq!(filter.coin, None);
        filter.set_coin(Some("SUI"));
        assert_eq!(filter.coin.as_deref(), Some("sui"));
        filter.set_coin(None);
        assert_eq!(filter.coin, None);
    }

    #[rstest]
    #[case::complete("USDC", "10", Some(CoinRule::new("usdc", 10.0)))]
    #[case::negative("sui", "-4", Some(CoinRule::new("sui", 0.0)))]
    #[case::garbage("sui", "abc", Some(CoinRule::new("sui", 0.0)))]
    #[case::empty_min("sui", "", Some(CoinRule::new("sui", 0.0)))]
    #[case::no_coin("", "10", None)]
    fn test_draft_commit(#[case] coin: &str, #[case] min: &str, #[case] expected: Option<CoinRule>) {
        let draft = DraftRule {
            coin: coin.to_string(),
            min_amount: min.to_string(),
        };
        assert_eq!(draft.commit(), expected);
    }

    #[test]
    fn test_matching_indices_preserve_order() {
        let txs = vec![
            transfer(SUI, 1, 3),
            transfer(USDC, 1, 2),
            transfer(SUI, 1, 1),
        ];
        let mut filter = FilterState::default();
        filter.set_coin(Some("sui"));
        assert_eq!(matching_indices(&txs, &filter, &[]), vec![0, 2]);
    }
}
