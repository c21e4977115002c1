//! Configuration for catalog loading.
//!
//! ```rust
//! use ingest::CatalogConfig;
//!
//! let config = CatalogConfig::default();
//! assert!(config.dedupe_names);
//! assert!(config.dedupe_urls);
//! config.validate().expect("defaults are valid");
//! ```
use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Controls how raw catalog rows are cleaned before they become
/// [`CatalogItem`](crate::CatalogItem)s.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Drop rows whose trimmed name was already seen. First occurrence wins.
    #[serde(default = "default_true")]
    pub dedupe_names: bool,
    /// Drop rows whose trimmed URL was already seen. First occurrence wins.
    #[serde(default = "default_true")]
    pub dedupe_urls: bool,
    /// Descriptions longer than this are truncated on a character boundary.
    /// `None` keeps them whole.
    #[serde(default)]
    pub max_description_chars: Option<usize>,
    /// Rows without a category get one guessed from their name and
    /// description instead of `Other`.
    #[serde(default)]
    pub infer_missing_categories: bool,
}

fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            dedupe_names: true,
            dedupe_urls: true,
            max_description_chars: None,
            infer_missing_categories: false,
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.max_description_chars == Some(0) {
            return Err(IngestError::InvalidConfig(
                "max_description_chars must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }
}
