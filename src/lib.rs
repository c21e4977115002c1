//! Workspace umbrella crate for the assessment recommender (`assessrec`).
//!
//! This crate stitches the catalog, embedder, index and recommender crates
//! together so front ends can go from a YAML config to a ready
//! [`Recommender`] with one call, and hosts the batch prediction and offline
//! evaluation helpers used by the CLI.

pub mod batch;
pub mod config;
pub mod eval;

pub use crate::config::{AppConfig, ConfigLoadError};
pub use canonical::{normalize_query, NormalizedQuery};
pub use index::{IndexConfig, IndexError, IndexKind};
pub use ingest::{Catalog, CatalogConfig, CatalogItem, Category, CleanReport, IngestError};
pub use matcher::{
    Recommendation, RecommendConfig, RecommendError, RecommendMetrics, RecommendOutcome,
    Recommender,
};
pub use semantic::{Embedder, SemanticConfig, SemanticError};

use std::error::Error;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tracing::{info, info_span, Instrument};

/// Errors raised while assembling the recommender or running batch jobs.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Ingest(IngestError),
    Semantic(SemanticError),
    Index(IndexError),
    Recommend(RecommendError),
    /// The embedder returned a different number of vectors than texts.
    EmbeddingCount { expected: usize, got: usize },
    MissingColumn(&'static str),
    Csv(String),
    Io(String),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Ingest(err) => write!(f, "catalog load failure: {err}"),
            PipelineError::Semantic(err) => write!(f, "embedding failure: {err}"),
            PipelineError::Index(err) => write!(f, "index build failure: {err}"),
            PipelineError::Recommend(err) => write!(f, "recommend failure: {err}"),
            PipelineError::EmbeddingCount { expected, got } => {
                write!(f, "embedder returned {got} vectors for {expected} catalog items")
            }
            PipelineError::MissingColumn(column) => {
                write!(f, "input file is missing required column '{column}'")
            }
            PipelineError::Csv(msg) => write!(f, "csv failure: {msg}"),
            PipelineError::Io(msg) => write!(f, "i/o failure: {msg}"),
        }
    }
}

impl Error for PipelineError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PipelineError::Ingest(err) => Some(err),
            PipelineError::Semantic(err) => Some(err),
            PipelineError::Index(err) => Some(err),
            PipelineError::Recommend(err) => Some(err),
            PipelineError::EmbeddingCount { .. }
            | PipelineError::MissingColumn(_)
            | PipelineError::Csv(_)
            | PipelineError::Io(_) => None,
        }
    }
}

impl From<IngestError> for PipelineError {
    fn from(value: IngestError) -> Self {
        PipelineError::Ingest(value)
    }
}

impl From<SemanticError> for PipelineError {
    fn from(value: SemanticError) -> Self {
        PipelineError::Semantic(value)
    }
}

impl From<IndexError> for PipelineError {
    fn from(value: IndexError) -> Self {
        PipelineError::Index(value)
    }
}

impl From<RecommendError> for PipelineError {
    fn from(value: RecommendError) -> Self {
        PipelineError::Recommend(value)
    }
}

impl From<csv::Error> for PipelineError {
    fn from(value: csv::Error) -> Self {
        PipelineError::Csv(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Io(value.to_string())
    }
}

/// Normalizes a front-end query and rejects it when nothing is left.
pub fn prepare_query(raw: Option<&str>) -> Result<NormalizedQuery, RecommendError> {
    let query = normalize_query(raw);
    if query.is_empty() {
        return Err(RecommendError::Input("query must not be empty".into()));
    }
    Ok(query)
}

/// Loads the catalog named in `cfg` and builds the recommender over it.
pub async fn build_recommender(cfg: &AppConfig) -> Result<Recommender, PipelineError> {
    let (catalog, report) =
        ingest::load_catalog_from_path(&cfg.catalog.path, &cfg.catalog.to_catalog_config())?;
    info!(
        path = %cfg.catalog.path.display(),
        kept = report.kept,
        dropped = report.dropped(),
        "catalog_ready"
    );
    build_recommender_from_catalog(catalog, cfg).await
}

/// Builds the configured embedder, then the recommender over `catalog`.
pub async fn build_recommender_from_catalog(
    catalog: Catalog,
    cfg: &AppConfig,
) -> Result<Recommender, PipelineError> {
    let embedder = semantic::build_embedder(&cfg.semantic.to_semantic_config())?;
    build_recommender_with_embedder(catalog, embedder, cfg).await
}

/// Embeds every catalog item with `embedder`, indexes the vectors and wires
/// the engine with the configured intent keywords.
pub async fn build_recommender_with_embedder(
    catalog: Catalog,
    embedder: Arc<dyn Embedder>,
    cfg: &AppConfig,
) -> Result<Recommender, PipelineError> {
    let span = info_span!("assessrec.build_recommender", items = catalog.len());
    async move {
        let start = Instant::now();
        let texts = catalog.embedding_texts();
        let embeddings = embedder.embed_batch(&texts).await?;
        if embeddings.len() != texts.len() {
            return Err(PipelineError::EmbeddingCount {
                expected: texts.len(),
                got: embeddings.len(),
            });
        }
        let vectors: Vec<Vec<f32>> = embeddings.into_iter().map(|e| e.vector).collect();
        let index = index::build_index(&cfg.index, &vectors)?;

        let engine = Recommender::new(
            Arc::new(catalog),
            embedder,
            index,
            cfg.recommender.clone(),
        )?
        .with_classifier(Arc::new(cfg.intents.to_classifier()));

        info!(
            items = engine.catalog().len(),
            model = engine.model_name(),
            index = engine.index_kind(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "recommender_ready"
        );
        Ok(engine)
    }
    .instrument(span)
    .await
}
