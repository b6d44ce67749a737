//! String helpers shared by the extractors, the engine and logging.
//!
//! All lengths here are counted in characters, not bytes, so truncation never
//! splits a multi-byte character.

use itertools::Itertools;

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` characters with an ellipsis and
/// byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    let head = truncate_chars(s, max);
    if head.len() == s.len() {
        s.to_string()
    } else {
        format!("{}…(+{} bytes)", head, s.len() - head.len())
    }
}

/// Borrow at most the first `max_chars` characters of `s`.
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((end, _)) => &s[..end],
        None => s,
    }
}

/// Build the local fallback excerpt: the first `max_words` whitespace-separated
/// tokens joined by single spaces, followed by `...`.
///
/// An empty input yields just `...`.
pub fn excerpt(text: &str, max_words: usize) -> String {
    let head = text.split_whitespace().take(max_words).join(" ");
    format!("{head}...")
}

/// Collapse every run of whitespace into a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().join(" ")
}
