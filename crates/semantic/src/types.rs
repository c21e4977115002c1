use serde::{Deserialize, Serialize};

/// Embedding output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticEmbedding {
    /// Final embedding values.
    pub vector: Vec<f32>,
    /// Name of the model that produced the vector.
    pub model_name: String,
    /// Dimension of `vector`.
    pub embedding_dim: usize,
    /// Whether [`vector`](Self::vector) was L2-normalized.
    pub normalized: bool,
}

impl SemanticEmbedding {
    /// Wraps a raw vector, normalizing it first when asked.
    pub fn from_vector(mut vector: Vec<f32>, model_name: &str, normalize: bool) -> Self {
        if normalize {
            crate::normalize::l2_normalize_in_place(&mut vector);
        }
        let embedding_dim = vector.len();
        Self {
            vector,
            model_name: model_name.to_string(),
            embedding_dim,
            normalized: normalize,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_vector_normalizes_on_request() {
        let emb = SemanticEmbedding::from_vector(vec![3.0, 4.0], "m", true);
        assert_eq!(emb.embedding_dim, 2);
        assert!(emb.normalized);
        assert!((emb.vector[0] - 0.6).abs() < 1e-6);

        let raw = SemanticEmbedding::from_vector(vec![3.0, 4.0], "m", false);
        assert_eq!(raw.vector, vec![3.0, 4.0]);
        assert!(!raw.normalized);
    }
}
