use serde::{Deserialize, Serialize};

use crate::error::SemanticError;

/// Runtime configuration describing which embedder to build.
///
/// # Example
/// ```
/// use semantic::{build_embedder, SemanticConfig};
///
/// let cfg = SemanticConfig {
///     mode: "fast".into(),
///     dimension: 256,
///     ..Default::default()
/// };
/// let embedder = build_embedder(&cfg).unwrap();
/// assert_eq!(embedder.model_name(), "feature-hash-v1");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticConfig {
    /// Embedder selector: `"fast"` (local feature hashing) or `"api"` (remote HTTP).
    pub mode: String,
    /// Label surfaced on every `SemanticEmbedding`. Also sent as `model` to
    /// OpenAI-style endpoints.
    pub model_name: String,
    /// Output dimension of the `"fast"` embedder. Remote models decide their own.
    pub dimension: usize,
    /// API inference endpoint when [`mode`](Self::mode) is `"api"`.
    pub api_url: Option<String>,
    /// Authorization header (e.g., `"Bearer hf_xxx"`).
    pub api_auth_header: Option<String>,
    /// Remote provider hint: `"hf"`, `"openai"`, or `"custom"` (default).
    pub api_provider: Option<String>,
    /// Overall API timeout in seconds.
    pub api_timeout_secs: Option<u64>,
    /// Normalize the resulting vector to unit length. Inner-product search
    /// relies on this.
    pub normalize: bool,
    /// Texts per remote request when embedding a batch.
    pub batch_size: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            mode: "fast".into(),
            model_name: "feature-hash-v1".into(),
            dimension: 384,
            api_url: None,
            api_auth_header: None,
            api_provider: None,
            api_timeout_secs: Some(30),
            normalize: true,
            batch_size: 32,
        }
    }
}

impl SemanticConfig {
    pub fn validate(&self) -> Result<(), SemanticError> {
        match self.mode.as_str() {
            "fast" => {
                if self.dimension == 0 {
                    return Err(SemanticError::InvalidConfig(
                        "dimension must be greater than 0".into(),
                    ));
                }
            }
            "api" => {
                let has_url = self
                    .api_url
                    .as_deref()
                    .is_some_and(|url| !url.trim().is_empty());
                if !has_url {
                    return Err(SemanticError::InvalidConfig(
                        "api_url is required for api mode".into(),
                    ));
                }
                if self.api_timeout_secs == Some(0) {
                    return Err(SemanticError::InvalidConfig(
                        "api_timeout_secs must be greater than 0".into(),
                    ));
                }
            }
            other => {
                return Err(SemanticError::InvalidConfig(format!(
                    "unknown mode '{other}', expected 'fast' or 'api'"
                )))
            }
        }
        if self.batch_size == 0 {
            return Err(SemanticError::InvalidConfig(
                "batch_size must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
