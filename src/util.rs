//! Shared utility helpers.

/// Quote characters that may wrap an identifier coming back from the catalog.
const QUOTE_CHARS: &[char] = &['\'', '"', '`', '[', ']'];

/// Remove surrounding quote characters from an identifier.
///
/// `[Sales]`, `"Sales"` and `'Sales'` all become `Sales`. Inner characters
/// are left alone.
#[inline]
pub fn strip_quotes(name: &str) -> &str {
    name.trim().trim_matches(QUOTE_CHARS)
}

/// Bracket-quote an identifier for embedding into T-SQL text.
///
/// Surrounding quotes are stripped first and any `]` left inside the
/// name is doubled, so the result is always a single delimited identifier.
pub fn quote_identifier(name: &str) -> String {
    format!("[{}]", strip_quotes(name).replace(']', "]]"))
}

/// Case-insensitive membership test for a list of names.
#[inline]
pub fn contains_ci(names: &[&str], needle: &str) -> bool {
    names.iter().any(|name| name.eq_ignore_ascii_case(needle))
}
