//! Text embedding.
//!
//! This crate turns text into dense vectors for similarity search. Callers
//! depend on the [`Embedder`] trait and receive a concrete implementation
//! from [`build_embedder`]:
//!
//! - **fast** - [`HashingEmbedder`], a deterministic feature-hashing model
//!   that needs no assets and no network. Good for tests, demos and small
//!   catalogs where lexical overlap is a reasonable proxy for relevance.
//! - **api** - [`ApiEmbedder`], which posts to a Hugging Face, OpenAI-style
//!   or custom embedding endpoint.
//!
//! Vectors are L2-normalized by default so inner product equals cosine
//! similarity.
//!
//! ## Quick example
//!
//! ```
//! use semantic::{build_embedder, SemanticConfig};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let embedder = build_embedder(&SemanticConfig::default()).unwrap();
//! let embedding = embedder.embed("Java developer").await.unwrap();
//! assert_eq!(embedding.embedding_dim, 384);
//! # }
//! ```
use std::sync::Arc;

use async_trait::async_trait;

pub mod config;
pub mod error;
pub mod types;

mod api;
mod hashing;
mod normalize;

pub use crate::api::ApiEmbedder;
pub use crate::config::SemanticConfig;
pub use crate::error::SemanticError;
pub use crate::hashing::HashingEmbedder;
pub use crate::normalize::l2_normalize_in_place;
pub use crate::types::SemanticEmbedding;

/// Maps text to an embedding vector.
///
/// Implementations are shared across request tasks, so they must be
/// `Send + Sync` and must not require `&mut self`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Label of the underlying model, surfaced in metadata endpoints.
    fn model_name(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<SemanticEmbedding, SemanticError>;

    /// Embeds many texts. The default calls [`embed`](Self::embed) in order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<SemanticEmbedding>, SemanticError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// Builds the embedder selected by `cfg.mode`.
pub fn build_embedder(cfg: &SemanticConfig) -> Result<Arc<dyn Embedder>, SemanticError> {
    cfg.validate()?;
    match cfg.mode.as_str() {
        "fast" => Ok(Arc::new(HashingEmbedder::new(cfg)?)),
        "api" => Ok(Arc::new(ApiEmbedder::new(cfg)?)),
        other => Err(SemanticError::InvalidConfig(format!(
            "unknown mode '{other}'"
        ))),
    }
}
