//! Syntactic email validation.

use regex::Regex;
use std::sync::LazyLock;

/// RFC 5322 "common case": dot-separated local-part atoms, `@`, then at least
/// two DNS-label-shaped segments. ASCII-only, case-insensitive, anchored.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"(?i-u)^",
        r"[a-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[a-z0-9!#$%&'*+/=?^_`{|}~-]+)*",
        r"@",
        r"(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+[a-z0-9](?:[a-z0-9-]*[a-z0-9])?",
        r"$",
    ))
    .expect("email pattern is a valid regex")
});

/// Classify a token as a syntactically valid email address.
///
/// Pure and total: never panics, and the empty string is invalid.
///
/// # Examples
///
/// ```
/// use email_core::validate;
///
/// assert!(validate("some@valid.email"));
/// assert!(!validate("invalid.email"));
/// assert!(!validate(""));
/// ```
pub fn validate(token: &str) -> bool {
    !token.is_empty() && EMAIL_PATTERN.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        for ok in [
            "a@b.co",
            "first.last@example.com",
            "x+tag@sub.domain.org",
            "UPPER@CASE.IO",
            "o'brien@example.ie",
            "a@b-c.d",
        ] {
            assert!(validate(ok), "{ok} should be valid");
        }
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in [
            "invalid.email",
            "a@b",
            "@b.com",
            "a@.com",
            "a@-b.com",
            "a@b-.com",
            "a..b@c.com",
            ".a@c.com",
            "a@b.com.",
            "a b@c.com",
            "a@b@c.com",
        ] {
            assert!(!validate(bad), "{bad} should be invalid");
        }
    }

    #[test]
    fn rejects_non_ascii_lookalikes() {
        // KELVIN SIGN case-folds to 'k' under Unicode rules.
        assert!(!validate("\u{212A}@b.com"));
        assert!(!validate("jürgen@example.de"));
    }
}
