//! # Vector index
//!
//! In-memory nearest-neighbour search over catalog embeddings. The index is
//! built once at start-up from the embedded catalog and is read-only after
//! that, so a single instance can be shared across request tasks.
//!
//! Two implementations sit behind the [`VectorIndex`] trait:
//!
//! - [`FlatIndex`]: exact inner product over the full matrix. The default,
//!   and the right choice for catalogs of a few hundred to a few thousand
//!   items.
//! - [`AnnIndex`]: HNSW graph (via `hnsw_rs`) for large catalogs, with an
//!   exact fallback below [`AnnConfig::min_vectors_for_ann`].
//!
//! Row ids are positions in the slice passed to [`build_index`]; callers map
//! them back to their own records.
//!
//! ## Example
//!
//! ```
//! use index::{build_index, IndexConfig};
//!
//! let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
//! let index = build_index(&IndexConfig::default(), &vectors).unwrap();
//! let hits = index.search(&[0.0, 1.0], 1).unwrap();
//! assert_eq!(hits[0].id, 1);
//! ```

pub mod ann;
mod flat;

use std::sync::Arc;

use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::ann::{AnnConfig, AnnIndex};
pub use crate::flat::FlatIndex;

/// One search hit: a row id and its similarity to the query (higher is
/// closer).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub id: usize,
    pub score: f32,
}

/// Read-only nearest-neighbour search.
pub trait VectorIndex: Send + Sync {
    /// Dimension every query must have.
    fn dimension(&self) -> usize;

    /// Number of indexed vectors.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns up to `n` hits ordered by descending score. Equal scores keep
    /// the order the index produced them in.
    fn search(&self, query: &[f32], n: usize) -> Result<Vec<Neighbor>, IndexError>;

    /// Short label for logs and metadata endpoints.
    fn kind(&self) -> &'static str;
}

/// Which index implementation [`build_index`] produces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexKind {
    #[default]
    Flat,
    Hnsw,
}

/// Index configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    #[serde(default)]
    pub kind: IndexKind,
    /// HNSW parameters, used when `kind` is [`IndexKind::Hnsw`].
    #[serde(default)]
    pub ann: AnnConfig,
}

impl IndexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kind(mut self, kind: IndexKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_ann(mut self, ann: AnnConfig) -> Self {
        self.ann = ann;
        self
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        self.ann.validate()
    }
}

/// Errors raised while building or querying an index.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IndexError {
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
    #[error("cannot build an index from zero vectors")]
    Empty,
    #[error("invalid index config: {0}")]
    InvalidConfig(String),
}

/// Builds the configured index over `vectors`. Every vector must have the
/// same length as the first.
pub fn build_index(
    cfg: &IndexConfig,
    vectors: &[Vec<f32>],
) -> Result<Arc<dyn VectorIndex>, IndexError> {
    cfg.validate()?;
    let dimension = vectors.first().map(Vec::len).ok_or(IndexError::Empty)?;

    let index: Arc<dyn VectorIndex> = match cfg.kind {
        IndexKind::Flat => Arc::new(FlatIndex::build(dimension, vectors)?),
        IndexKind::Hnsw => Arc::new(AnnIndex::build(dimension, vectors, cfg.ann)?),
    };
    info!(
        "built {} index: {} vectors, dimension {}",
        index.kind(),
        index.len(),
        dimension
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_rejected() {
        assert_eq!(
            build_index(&IndexConfig::default(), &[]).err(),
            Some(IndexError::Empty)
        );
    }

    #[test]
    fn ragged_input_rejected() {
        let vectors = vec![vec![1.0, 0.0], vec![1.0]];
        assert!(matches!(
            build_index(&IndexConfig::default(), &vectors),
            Err(IndexError::DimensionMismatch {
                expected: 2,
                got: 1
            })
        ));
    }

    #[test]
    fn kinds_agree_on_small_inputs() {
        let vectors = vec![vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]];
        let flat = build_index(&IndexConfig::default(), &vectors).expect("flat builds");
        let hnsw = build_index(&IndexConfig::new().with_kind(IndexKind::Hnsw), &vectors)
            .expect("hnsw builds");

        let a = flat.search(&[0.0, 1.0], 3).expect("flat search");
        let b = hnsw.search(&[0.0, 1.0], 3).expect("hnsw search");
        assert_eq!(
            a.iter().map(|h| h.id).collect::<Vec<_>>(),
            b.iter().map(|h| h.id).collect::<Vec<_>>()
        );
        assert_eq!(flat.kind(), "flat");
        assert_eq!(flat.len(), 3);
        assert!(!flat.is_empty());
    }

    #[test]
    fn config_deserializes_with_defaults() {
        let cfg: IndexConfig = serde_json::from_str(r#"{"kind":"hnsw"}"#).expect("parses");
        assert_eq!(cfg.kind, IndexKind::Hnsw);
        assert_eq!(cfg.ann, AnnConfig::default());
    }
}
