use index::IndexError;
use ingest::{CatalogId, CatalogItem, Category};
use semantic::SemanticError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Engine-level tuning knobs.
///
/// `RecommendConfig` is serde-friendly so it can be embedded in the YAML
/// application config.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendConfig {
    /// Pool size is `ceil(k * oversample_factor)`, floored at
    /// [`min_candidates`](Self::min_candidates).
    #[serde(default = "RecommendConfig::default_oversample_factor")]
    pub oversample_factor: f32,
    /// Minimum number of candidates pulled from the index per request.
    #[serde(default = "RecommendConfig::default_min_candidates")]
    pub min_candidates: usize,
    /// `k` used by front ends when the caller does not pass one.
    #[serde(default = "RecommendConfig::default_k")]
    pub default_k: usize,
    /// Upper bound front ends clamp `k` to.
    #[serde(default = "RecommendConfig::default_max_k")]
    pub max_k: usize,
    /// Whether front ends diversify when the caller does not say.
    #[serde(default = "RecommendConfig::default_diversify")]
    pub diversify: bool,
}

impl RecommendConfig {
    pub(crate) fn default_oversample_factor() -> f32 {
        3.0
    }

    pub(crate) fn default_min_candidates() -> usize {
        30
    }

    pub(crate) fn default_k() -> usize {
        10
    }

    pub(crate) fn default_max_k() -> usize {
        10
    }

    pub(crate) fn default_diversify() -> bool {
        true
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), RecommendError> {
        if !self.oversample_factor.is_finite() || self.oversample_factor < 1.0 {
            return Err(RecommendError::InvalidConfig(
                "oversample_factor must be >= 1.0".into(),
            ));
        }
        if self.max_k == 0 {
            return Err(RecommendError::InvalidConfig(
                "max_k must be greater than zero".into(),
            ));
        }
        if self.default_k == 0 || self.default_k > self.max_k {
            return Err(RecommendError::InvalidConfig(format!(
                "default_k must be between 1 and max_k ({})",
                self.max_k
            )));
        }
        Ok(())
    }

    /// Number of candidates to request from the index for a result of size
    /// `k`.
    pub fn pool_size(&self, k: usize) -> usize {
        let scaled = ((k as f32) * self.oversample_factor).ceil() as usize;
        scaled.max(self.min_candidates)
    }

    /// Clamps a caller-supplied `k` into `[1, max_k]`.
    pub fn clamp_k(&self, k: i64) -> usize {
        let max = i64::try_from(self.max_k).unwrap_or(i64::MAX);
        // max is at least 1 for a validated config
        k.clamp(1, max.max(1)) as usize
    }
}

impl Default for RecommendConfig {
    fn default() -> Self {
        Self {
            oversample_factor: Self::default_oversample_factor(),
            min_candidates: Self::default_min_candidates(),
            default_k: Self::default_k(),
            max_k: Self::default_max_k(),
            diversify: Self::default_diversify(),
        }
    }
}

/// A catalog item paired with its similarity to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredCandidate<'a> {
    pub item: &'a CatalogItem,
    pub score: f32,
}

/// Which selector pass accepted a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionPhase {
    /// Accepted while filling a category quota.
    Quota,
    /// Accepted while topping up the list by relevance after quotas.
    Fill,
    /// Taken straight from the top of the pool with diversification off.
    Relevance,
}

/// A candidate chosen by the selector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selection<'a> {
    pub candidate: ScoredCandidate<'a>,
    pub phase: SelectionPhase,
}

/// One entry of the final recommendation list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    #[serde(skip)]
    pub id: CatalogId,
    pub name: String,
    pub url: String,
    pub category: Category,
    pub score: f32,
    #[serde(skip)]
    pub phase: SelectionPhase,
}

/// Errors produced by the recommendation engine.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RecommendError {
    /// Invalid engine configuration.
    #[error("invalid recommend config: {0}")]
    InvalidConfig(String),
    /// The caller supplied unusable input. Raised by front ends before the
    /// engine runs.
    #[error("invalid input: {0}")]
    Input(String),
    /// The embedder failed.
    #[error("embedding failed: {0}")]
    Embedding(#[from] SemanticError),
    /// Index search failed.
    #[error("index search failed: {0}")]
    Index(#[from] IndexError),
    /// The index returned a row id the catalog does not have.
    #[error("index returned unknown catalog id {0}")]
    UnknownCandidate(usize),
}

impl RecommendError {
    /// True for failures of the embedder, the index or the catalog mapping.
    /// These abort the request with no partial result.
    pub fn is_retrieval_failure(&self) -> bool {
        matches!(
            self,
            RecommendError::Embedding(_)
                | RecommendError::Index(_)
                | RecommendError::UnknownCandidate(_)
        )
    }

    /// Stable label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendError::InvalidConfig(_) => "invalid_config",
            RecommendError::Input(_) => "input",
            RecommendError::Embedding(_) => "embedding",
            RecommendError::Index(_) => "index",
            RecommendError::UnknownCandidate(_) => "unknown_candidate",
        }
    }
}
