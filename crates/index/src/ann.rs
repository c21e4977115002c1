//! Approximate nearest neighbour search using HNSW.
//!
//! HNSW pays off once a catalog reaches thousands of items. Below
//! [`AnnConfig::min_vectors_for_ann`] the index answers with an exact scan,
//! so small catalogs get exact results without a separate code path.
//!
//! Scores are reported as cosine similarity (`1 - cosine distance`), which
//! matches the inner product of the flat index for normalized vectors.

use hnsw_rs::prelude::*;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::flat::FlatIndex;
use crate::{IndexError, Neighbor, VectorIndex};

/// Configuration for HNSW construction and search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnConfig {
    /// Neighbours per node (higher = better recall, slower build).
    #[serde(default = "default_m")]
    pub m: usize,
    /// Candidate list size during construction.
    #[serde(default = "default_ef_construction")]
    pub ef_construction: usize,
    /// Candidate list size during search. Raised to the requested `n` when
    /// smaller.
    #[serde(default = "default_ef_search")]
    pub ef_search: usize,
    /// Below this many vectors the graph is not built and search is exact.
    #[serde(default = "default_min_vectors_for_ann")]
    pub min_vectors_for_ann: usize,
}

fn default_m() -> usize {
    16
}

fn default_ef_construction() -> usize {
    200
}

fn default_ef_search() -> usize {
    50
}

fn default_min_vectors_for_ann() -> usize {
    1000
}

impl Default for AnnConfig {
    fn default() -> Self {
        Self {
            m: default_m(),
            ef_construction: default_ef_construction(),
            ef_search: default_ef_search(),
            min_vectors_for_ann: default_min_vectors_for_ann(),
        }
    }
}

impl AnnConfig {
    pub fn with_m(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    pub fn with_ef_construction(mut self, ef: usize) -> Self {
        self.ef_construction = ef;
        self
    }

    pub fn with_ef_search(mut self, ef: usize) -> Self {
        self.ef_search = ef;
        self
    }

    pub fn with_min_vectors_for_ann(mut self, min: usize) -> Self {
        self.min_vectors_for_ann = min;
        self
    }

    /// Check if the graph should be built for a dataset of this size.
    pub fn should_use_ann(&self, num_vectors: usize) -> bool {
        num_vectors >= self.min_vectors_for_ann.max(10)
    }

    pub fn validate(&self) -> Result<(), IndexError> {
        if self.m == 0 {
            return Err(IndexError::InvalidConfig("ann.m must be greater than 0".into()));
        }
        if self.ef_construction == 0 || self.ef_search == 0 {
            return Err(IndexError::InvalidConfig(
                "ann.ef_construction and ann.ef_search must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// HNSW index with an exact fallback.
pub struct AnnIndex {
    config: AnnConfig,
    exact: FlatIndex,
    hnsw: Option<Hnsw<'static, f32, DistCosine>>,
}

impl AnnIndex {
    /// Builds the exact matrix and, when the dataset is large enough, the
    /// HNSW graph over the same rows.
    pub fn build(
        dimension: usize,
        vectors: &[Vec<f32>],
        config: AnnConfig,
    ) -> Result<Self, IndexError> {
        config.validate()?;
        let exact = FlatIndex::build(dimension, vectors)?;

        let nb_elem = vectors.len();
        let hnsw = if config.should_use_ann(nb_elem) {
            let nb_layer = 16.min((nb_elem as f32).ln().trunc() as usize).max(1);
            let hnsw = Hnsw::<f32, DistCosine>::new(
                config.m,
                nb_elem,
                nb_layer,
                config.ef_construction,
                DistCosine {},
            );
            let data_for_insertion: Vec<(&Vec<f32>, usize)> = vectors
                .iter()
                .enumerate()
                .map(|(idx, vec)| (vec, idx))
                .collect();
            hnsw.parallel_insert(&data_for_insertion);
            debug!("built hnsw graph over {nb_elem} vectors ({nb_layer} layers)");
            Some(hnsw)
        } else {
            debug!("{nb_elem} vectors below ann threshold, using exact scan");
            None
        };

        Ok(Self {
            config,
            exact,
            hnsw,
        })
    }

    /// Whether searches go through the HNSW graph.
    pub fn uses_graph(&self) -> bool {
        self.hnsw.is_some()
    }

    pub fn config(&self) -> &AnnConfig {
        &self.config
    }
}

impl VectorIndex for AnnIndex {
    fn dimension(&self) -> usize {
        self.exact.dimension()
    }

    fn len(&self) -> usize {
        self.exact.len()
    }

    fn search(&self, query: &[f32], n: usize) -> Result<Vec<Neighbor>, IndexError> {
        if query.len() != self.dimension() {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension(),
                got: query.len(),
            });
        }
        if n == 0 {
            return Ok(Vec::new());
        }

        // Cosine distance is undefined for a zero query.
        let zero_query = query.iter().all(|x| *x == 0.0);
        match &self.hnsw {
            Some(hnsw) if !zero_query => {
                let ef = self.config.ef_search.max(n);
                let mut hits: Vec<Neighbor> = hnsw
                    .search(query, n, ef)
                    .into_iter()
                    .map(|neighbour| Neighbor {
                        id: neighbour.get_origin_id(),
                        score: 1.0 - neighbour.distance,
                    })
                    .collect();
                hits.sort_by(|a, b| b.score.total_cmp(&a.score));
                Ok(hits)
            }
            _ => Ok(self.exact.scan(query, n)),
        }
    }

    fn kind(&self) -> &'static str {
        if self.uses_graph() {
            "hnsw"
        } else {
            "hnsw-exact"
        }
    }
}
