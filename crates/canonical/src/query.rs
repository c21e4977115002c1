use std::fmt;

use serde::{Deserialize, Serialize};

use crate::whitespace::collapse_whitespace;

/// Query text that has passed through [`normalize_query`].
///
/// Downstream stages accept this type instead of `&str` so a raw, untrimmed
/// query can never reach the classifier or the embedder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizedQuery(String);

impl NormalizedQuery {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Length in characters, used by front ends for minimum-length checks.
    pub fn char_len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for NormalizedQuery {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Normalizes a raw query: trims it and collapses internal whitespace.
///
/// Missing input is treated as the empty string. This never fails; callers
/// decide whether an empty query is acceptable.
///
/// ```rust
/// use canonical::normalize_query;
///
/// let q = normalize_query(Some("  Java   developer\n"));
/// assert_eq!(q.as_str(), "Java developer");
/// assert!(normalize_query(None).is_empty());
/// ```
pub fn normalize_query(raw: Option<&str>) -> NormalizedQuery {
    NormalizedQuery(raw.map(collapse_whitespace).unwrap_or_default())
}

impl From<&str> for NormalizedQuery {
    fn from(raw: &str) -> Self {
        normalize_query(Some(raw))
    }
}

impl From<String> for NormalizedQuery {
    fn from(raw: String) -> Self {
        normalize_query(Some(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_query_is_empty() {
        assert_eq!(normalize_query(None).as_str(), "");
    }

    #[test]
    fn whitespace_only_is_empty() {
        assert!(normalize_query(Some(" \t\r\n ")).is_empty());
    }

    #[test]
    fn case_is_preserved() {
        let q = normalize_query(Some("  SQL  Server DBA "));
        assert_eq!(q.as_str(), "SQL Server DBA");
    }

    #[test]
    fn char_len_counts_scalars() {
        let q = NormalizedQuery::from("caf\u{e9}");
        assert_eq!(q.len(), 5);
        assert_eq!(q.char_len(), 4);
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_query(Some("  a   b  "));
        let twice = normalize_query(Some(once.as_str()));
        assert_eq!(once, twice);
    }
}
