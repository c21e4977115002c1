use ndarray::{Array2, ArrayView1};

use crate::{IndexError, Neighbor, VectorIndex};

/// Exact inner-product index.
///
/// Vectors are stored as one row-major matrix and scored with a single
/// matrix-vector product. With L2-normalized inputs the score is cosine
/// similarity. Results are ordered by descending score; equal scores keep
/// insertion order.
#[derive(Debug, Clone)]
pub struct FlatIndex {
    matrix: Array2<f32>,
}

impl FlatIndex {
    /// Builds an index whose row `i` is `vectors[i]`.
    pub fn build(dimension: usize, vectors: &[Vec<f32>]) -> Result<Self, IndexError> {
        if dimension == 0 {
            return Err(IndexError::InvalidConfig(
                "dimension must be greater than 0".into(),
            ));
        }
        let mut flat = Vec::with_capacity(vectors.len() * dimension);
        for vector in vectors {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    got: vector.len(),
                });
            }
            flat.extend_from_slice(vector);
        }
        let matrix = Array2::from_shape_vec((vectors.len(), dimension), flat)
            .map_err(|e| IndexError::InvalidConfig(format!("matrix shape: {e}")))?;
        Ok(Self { matrix })
    }

    /// Scores every row against `query`, best first.
    pub(crate) fn scan(&self, query: &[f32], n: usize) -> Vec<Neighbor> {
        if n == 0 || self.matrix.nrows() == 0 {
            return Vec::new();
        }
        let scores = self.matrix.dot(&ArrayView1::from(query));
        let mut hits: Vec<Neighbor> = scores
            .iter()
            .enumerate()
            .map(|(id, score)| Neighbor { id, score: *score })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(n);
        hits
    }
}

impl VectorIndex for FlatIndex {
    fn dimension(&self) -> usize {
        self.matrix.ncols()
    }

    fn len(&self) -> usize {
        self.matrix.nrows()
    }

    fn search(&self, query: &[f32], n: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension(),
                got: query.len(),
            });
        }
        Ok(self.scan(query, n))
    }

    fn kind(&self) -> &'static str {
        "flat"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_vectors() -> Vec<Vec<f32>> {
        vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.6, 0.8, 0.0],
            vec![0.0, 0.0, 1.0],
        ]
    }

    #[test]
    fn orders_by_descending_inner_product() {
        let index = FlatIndex::build(3, &unit_vectors()).expect("index builds");
        let hits = index.search(&[0.0, 1.0, 0.0], 3).expect("search ok");
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![1, 2, 0]);
        assert!((hits[0].score - 1.0).abs() < 1e-6);
        assert!((hits[1].score - 0.8).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let vectors = vec![vec![0.5, 0.5], vec![1.0, 0.0], vec![0.5, 0.5]];
        let index = FlatIndex::build(2, &vectors).expect("index builds");
        let hits = index.search(&[0.0, 0.0], 3).expect("search ok");
        let ids: Vec<usize> = hits.iter().map(|h| h.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn n_larger_than_index_returns_everything() {
        let index = FlatIndex::build(3, &unit_vectors()).expect("index builds");
        assert_eq!(index.search(&[1.0, 0.0, 0.0], 30).expect("search ok").len(), 4);
        assert!(index.search(&[1.0, 0.0, 0.0], 0).expect("search ok").is_empty());
    }

    #[test]
    fn dimension_mismatch_rejected() {
        let index = FlatIndex::build(3, &unit_vectors()).expect("index builds");
        assert_eq!(
            index.search(&[1.0, 0.0], 1).err(),
            Some(IndexError::DimensionMismatch {
                expected: 3,
                got: 2
            })
        );
        assert!(FlatIndex::build(2, &unit_vectors()).is_err());
    }
}
