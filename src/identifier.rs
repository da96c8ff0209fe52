//! Extension identifier grammar.
//!
//! Two shapes are accepted, with ASCII letters in either case:
//!
//! - a braced UUID: `{12345678-abcd-ef01-2345-6789abcdef01}`
//! - an email-like token: `local@domain`, where the local part may be empty
//!   and both parts use ASCII letters, digits, `.`, `_` and `-`

use regex::Regex;
use std::sync::LazyLock;

static IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:\{[0-9A-Fa-f]{8}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{4}-[0-9A-Fa-f]{12}\}|[A-Za-z0-9._-]*@[A-Za-z0-9._-]+)$",
    )
    .unwrap()
});

/// Returns true if `candidate` is a legal extension identifier.
///
/// # Example
///
/// ```
/// use xpipack::identifier::is_valid_identifier;
///
/// assert!(is_valid_identifier("{12345678-1234-1234-1234-123456789012}"));
/// assert!(is_valid_identifier("addon@example.com"));
/// assert!(is_valid_identifier("@myext"));
/// assert!(!is_valid_identifier("not-an-id"));
/// assert!(!is_valid_identifier(""));
/// ```
pub fn is_valid_identifier(candidate: &str) -> bool {
    IDENTIFIER_PATTERN.is_match(candidate)
}
