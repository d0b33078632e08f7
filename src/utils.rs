//! Small helpers for text parsing, timestamps and log formatting.

use crate::models::SCRAPED_AT_FORMAT;
use chrono::Local;

/// Truncate a string for logging purposes.
///
/// Counts characters rather than bytes so titles with multi-byte text never
/// split inside a code point.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 chars)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((cut, _)) => {
            let rest = s[cut..].chars().count();
            format!("{}…(+{} chars)", &s[..cut], rest)
        }
    }
}

/// Parse the count at the front of texts like `"42 points"` or `"7 comments"`.
///
/// Only the first whitespace-delimited token is considered, and only when it
/// is made of ASCII digits. Anything else (`"discuss"`, `""`, overflow) is 0.
pub fn leading_count(text: &str) -> u32 {
    text.split_whitespace()
        .next()
        .filter(|token| token.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|token| token.parse().ok())
        .unwrap_or(0)
}

/// Current local time in the record timestamp format.
pub fn scraped_at_now() -> String {
    Local::now().format(SCRAPED_AT_FORMAT).to_string()
}
