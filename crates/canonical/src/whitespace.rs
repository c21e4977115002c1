//! Whitespace normalization.
//!
//! Whitespace follows Unicode's definition (`char::is_whitespace`), so tabs,
//! newlines, carriage returns and non-breaking spaces all count as
//! separators.
//!
//! ```rust
//! use canonical::collapse_whitespace;
//!
//! assert_eq!(collapse_whitespace("  hello   world  "), "hello world");
//! ```

/// Collapses every run of whitespace into a single ASCII space and trims both
/// ends.
///
/// Returns an empty string for empty or whitespace-only input.
///
/// ```rust
/// use canonical::collapse_whitespace;
///
/// assert_eq!(collapse_whitespace("hello\r\n\tworld"), "hello world");
/// assert_eq!(collapse_whitespace("hello\u{00A0}world"), "hello world");
/// assert_eq!(collapse_whitespace("   \n\t   "), "");
/// ```
pub fn collapse_whitespace(text: &str) -> String {
    let mut normalized = String::with_capacity(text.len());
    for segment in text.split_whitespace() {
        if !normalized.is_empty() {
            normalized.push(' ');
        }
        normalized.push_str(segment);
    }
    normalized
}
