use async_trait::async_trait;
use fxhash::hash64;

use crate::normalize::l2_normalize_in_place;
use crate::{Embedder, SemanticConfig, SemanticEmbedding, SemanticError};

const WORD_WEIGHT: f32 = 1.0;
const TRIGRAM_WEIGHT: f32 = 0.5;

/// Deterministic feature-hashing embedder.
///
/// Each word term and each character trigram of a term (with `<` `>`
/// boundary markers) is hashed into one of `dimension` buckets. The sign of
/// the contribution comes from the top hash bit so collisions tend to cancel
/// rather than pile up. Trigrams let inflections such as "developer" and
/// "development" share mass.
///
/// Changing the feature scheme changes every vector; bump the model name
/// when doing so.
#[derive(Debug, Clone)]
pub struct HashingEmbedder {
    dimension: usize,
    model_name: String,
    normalize: bool,
}

impl HashingEmbedder {
    pub fn new(cfg: &SemanticConfig) -> Result<Self, SemanticError> {
        if cfg.dimension == 0 {
            return Err(SemanticError::InvalidConfig(
                "dimension must be greater than 0".into(),
            ));
        }
        Ok(Self {
            dimension: cfg.dimension,
            model_name: cfg.model_name.clone(),
            normalize: cfg.normalize,
        })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Synchronous core shared by [`Embedder::embed`] and batch embedding.
    pub fn embed_text(&self, text: &str) -> SemanticEmbedding {
        let mut vector = vec![0f32; self.dimension];
        for term in canonical::terms(text) {
            self.add_feature(&mut vector, &format!("w:{term}"), WORD_WEIGHT);

            let padded: Vec<char> = format!("<{term}>").chars().collect();
            if padded.len() > 3 {
                for window in padded.windows(3) {
                    let trigram: String = window.iter().collect();
                    self.add_feature(&mut vector, &format!("c:{trigram}"), TRIGRAM_WEIGHT);
                }
            }
        }
        if self.normalize {
            l2_normalize_in_place(&mut vector);
        }
        SemanticEmbedding {
            embedding_dim: self.dimension,
            vector,
            model_name: self.model_name.clone(),
            normalized: self.normalize,
        }
    }

    fn add_feature(&self, vector: &mut [f32], feature: &str, weight: f32) {
        let h = hash64(feature.as_bytes());
        let idx = (h % self.dimension as u64) as usize;
        let sign = if h >> 63 == 0 { 1.0 } else { -1.0 };
        vector[idx] += sign * weight;
    }
}

#[async_trait]
impl Embedder for HashingEmbedder {
    fn model_name(&self) -> &str {
        &self.model_name
    }

    async fn embed(&self, text: &str) -> Result<SemanticEmbedding, SemanticError> {
        Ok(self.embed_text(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<SemanticEmbedding>, SemanticError> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedder() -> HashingEmbedder {
        HashingEmbedder::new(&SemanticConfig::default()).expect("default config is valid")
    }

    fn dot(a: &[f32], b: &[f32]) -> f32 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn dimension_and_unit_length() {
        let emb = embedder().embed_text("Java developer with strong coding skills");
        assert_eq!(emb.embedding_dim, 384);
        assert_eq!(emb.vector.len(), 384);
        assert!(emb.normalized);
        let norm: f32 = emb.vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[test]
    fn deterministic_across_instances() {
        let a = embedder().embed_text("same text");
        let b = embedder().embed_text("same text");
        assert_eq!(a.vector, b.vector);
    }

    #[test]
    fn case_and_punctuation_do_not_matter() {
        let a = embedder().embed_text("Java Developer");
        let b = embedder().embed_text("java, developer!");
        assert_eq!(a.vector, b.vector);
    }

    #[test]
    fn shared_terms_score_higher_than_unrelated_text() {
        let e = embedder();
        let query = e.embed_text("java developer");
        let related = e.embed_text("Core Java programming test for developers");
        let unrelated = e.embed_text("Numerical reasoning aptitude");
        assert!(dot(&query.vector, &related.vector) > dot(&query.vector, &unrelated.vector));
    }

    #[test]
    fn empty_text_is_zero_vector() {
        let emb = embedder().embed_text("   ");
        assert!(emb.vector.iter().all(|x| *x == 0.0));
    }

    #[test]
    fn zero_dimension_rejected() {
        let cfg = SemanticConfig {
            dimension: 0,
            ..Default::default()
        };
        assert!(HashingEmbedder::new(&cfg).is_err());
    }

    #[tokio::test]
    async fn batch_matches_single_calls() {
        let e = embedder();
        let texts = vec!["alpha".to_string(), "beta gamma".to_string()];
        let batch = e.embed_batch(&texts).await.expect("batch embeds");
        assert_eq!(batch.len(), 2);
        for (text, emb) in texts.iter().zip(&batch) {
            let single = e.embed(text).await.expect("single embeds");
            assert_eq!(&single, emb);
        }
    }
}
