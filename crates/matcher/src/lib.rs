//! # Assessment recommender core (`matcher`)
//!
//! ## Purpose
//!
//! `matcher` turns a free-text hiring need into a short, category-balanced
//! list of catalog assessments. It sits on top of the catalog (`ingest`),
//! the embedders (`semantic`) and the vector index (`index`).
//!
//! A request flows through these stages:
//!
//! 1. **Normalize** the query (`canonical::normalize_query`).
//! 2. **Classify** it into five intent flags ([`IntentClassifier`]).
//! 3. **Plan** per-category quotas from the flags ([`QuotaPlanner`]).
//! 4. **Retrieve** an oversampled candidate pool by embedding similarity
//!    ([`CandidateRetriever`]).
//! 5. **Select** up to `k` candidates, quotas first then by relevance
//!    ([`diversify::select`]).
//! 6. **Assemble** the output records ([`Recommendation`]).
//!
//! ## Core Types
//!
//! - [`RecommendConfig`]: oversampling, pool floor and `k` bounds.
//! - [`Recommender`]: the engine; cheap to share behind an `Arc`.
//! - [`QueryPlan`] / [`RecommendOutcome`]: introspection of one request.
//! - [`RecommendError`]: configuration, input and retrieval failures.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use index::{build_index, IndexConfig};
//! use ingest::{load_catalog_from_path, CatalogConfig};
//! use matcher::{RecommendConfig, Recommender};
//! use semantic::{HashingEmbedder, SemanticConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let (catalog, _report) = load_catalog_from_path("data/catalog.csv", &CatalogConfig::default())?;
//! let embedder = HashingEmbedder::new(&SemanticConfig::default())?;
//! let vectors: Vec<Vec<f32>> = catalog
//!     .embedding_texts()
//!     .iter()
//!     .map(|t| embedder.embed_text(t).vector)
//!     .collect();
//! let index = build_index(&IndexConfig::default(), &vectors)?;
//!
//! let engine = Recommender::new(Arc::new(catalog), Arc::new(embedder), index, RecommendConfig::default())?;
//! for rec in engine.recommend("Java developer who works with stakeholders", 10, true).await? {
//!     println!("{} ({}) {:.3}", rec.name, rec.category, rec.score);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Observability
//!
//! Each call runs inside a `matcher.recommend` tracing span. Attach a
//! [`RecommendMetrics`] implementation with [`Recommender::with_metrics`] to
//! record latency and result counts.

pub mod assemble;
pub mod diversify;
pub mod engine;
pub mod intent;
pub mod metrics;
pub mod quota;
pub mod retriever;
pub mod types;

pub use crate::engine::{QueryPlan, RecommendOutcome, Recommender};
pub use crate::intent::{Intent, IntentClassifier, IntentSignals, KeywordIntentClassifier};
pub use crate::metrics::RecommendMetrics;
pub use crate::quota::{QuotaMap, QuotaPlanner, QuotaRule};
pub use crate::retriever::CandidateRetriever;
pub use crate::types::{
    RecommendConfig, RecommendError, Recommendation, ScoredCandidate, Selection, SelectionPhase,
};
