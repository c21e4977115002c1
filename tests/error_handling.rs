use std::path::PathBuf;
use std::sync::Arc;

use assessrec::{
    build_recommender, build_recommender_from_catalog, build_recommender_with_embedder,
    AppConfig, Catalog, CatalogConfig, ConfigLoadError, Embedder, IngestError, PipelineError,
    SemanticError,
};
use async_trait::async_trait;
use ingest::RawCatalogRecord;
use semantic::SemanticEmbedding;

fn small_catalog() -> Catalog {
    let records = vec![
        RawCatalogRecord::new("Java 8", "https://x/java", "Coding", "java"),
        RawCatalogRecord::new("OPQ", "https://x/opq", "Personality & Behavior", "personality"),
    ];
    Catalog::from_records(records, &CatalogConfig::default())
        .expect("catalog builds")
        .0
}

struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    fn model_name(&self) -> &str {
        "broken"
    }

    async fn embed(&self, _text: &str) -> Result<SemanticEmbedding, SemanticError> {
        Err(SemanticError::Request("connection refused".into()))
    }
}

struct ShortBatchEmbedder;

#[async_trait]
impl Embedder for ShortBatchEmbedder {
    fn model_name(&self) -> &str {
        "short"
    }

    async fn embed(&self, _text: &str) -> Result<SemanticEmbedding, SemanticError> {
        Ok(SemanticEmbedding::from_vector(vec![1.0, 0.0], "short", true))
    }

    async fn embed_batch(&self, _texts: &[String]) -> Result<Vec<SemanticEmbedding>, SemanticError> {
        Ok(vec![SemanticEmbedding::from_vector(vec![1.0, 0.0], "short", true)])
    }
}

#[tokio::test]
async fn missing_catalog_file_is_an_ingest_error() {
    let mut cfg = AppConfig::default();
    cfg.catalog.path = PathBuf::from("/nonexistent/catalog.csv");
    let result = build_recommender(&cfg).await;
    assert!(matches!(
        result,
        Err(PipelineError::Ingest(IngestError::Io(_)))
    ));
}

#[tokio::test]
async fn embedder_failure_during_build_bubbles_up() {
    let result =
        build_recommender_with_embedder(small_catalog(), Arc::new(BrokenEmbedder), &AppConfig::default())
            .await;
    assert!(matches!(
        result,
        Err(PipelineError::Semantic(SemanticError::Request(_)))
    ));
}

#[tokio::test]
async fn short_embedding_batch_is_rejected() {
    let result = build_recommender_with_embedder(
        small_catalog(),
        Arc::new(ShortBatchEmbedder),
        &AppConfig::default(),
    )
    .await;
    assert_eq!(
        result.err(),
        Some(PipelineError::EmbeddingCount {
            expected: 2,
            got: 1
        })
    );
}

#[tokio::test]
async fn invalid_semantic_mode_is_rejected_before_embedding() {
    let mut cfg = AppConfig::default();
    cfg.semantic.mode = "onnx".into();
    let result = build_recommender_from_catalog(small_catalog(), &cfg).await;
    assert!(matches!(
        result,
        Err(PipelineError::Semantic(SemanticError::InvalidConfig(_)))
    ));
}

#[test]
fn malformed_yaml_is_a_parse_error() {
    let result = AppConfig::from_yaml("recommender: [not, a, map]");
    assert!(matches!(result, Err(ConfigLoadError::YamlParse(_))));
}

#[test]
fn pipeline_errors_render_their_cause() {
    let err = PipelineError::from(IngestError::EmptyCatalog);
    assert!(err.to_string().contains("no usable rows"));
    assert!(std::error::Error::source(&err).is_some());
}
