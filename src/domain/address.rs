//! Address display helpers.

/// Characters kept from a resolved name before the `..` marker.
const NAME_DISPLAY_CHARS: usize = 9;

/// Shortens an address to its first 3 and last 4 characters joined by `..`.
///
/// Addresses of 7 characters or fewer are returned unchanged.
#[must_use]
pub fn short_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 7 {
        return address.to_string();
    }
    let head: String = chars[..3].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}..{tail}")
}

/// Truncates a resolved name for node labels (`alice.sui` -> `alice.sui..`).
#[must_use]
pub fn truncate_name(name: &str) -> String {
    let head: String = name.chars().take(NAME_DISPLAY_CHARS).collect();
    format!("{head}..")
}

/// Normalizes user-entered addresses: trimmed and lowercased.
#[must_use]
pub fn normalize_address(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Case-insensitive address comparison.
#[must_use]
pub fn same_address(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::long("0x1234567890abcdef", "0x1..cdef")]
    #[case::exactly_seven("0x12345", "0x12345")]
    #[case::eight("0x123456", "0x1..3456")]
    #[case::empty("", "")]
    fn test_short_address(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(short_address(input), expected);
    }

    #[test]
    fn test_truncate_name() {
        assert_eq!(truncate_name("alice.sui"), "alice.sui..");
        assert_eq!(truncate_name("averyverylongname.sui"), "averyvery..");
        assert_eq!(truncate_name("bob"), "bob..");
    }

    #[test]
    fn test_normalize_and_compare() {
        assert_eq!(normalize_address("  0xABcd \n"), "0xabcd");
        assert!(same_address("0xABCD", "0xabcd"));
        assert!(!same_address("0xabce", "0xabcd"));
    }
}
