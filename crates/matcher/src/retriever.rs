use std::collections::HashSet;
use std::sync::Arc;

use canonical::NormalizedQuery;
use index::VectorIndex;
use ingest::{Catalog, CatalogId};
use semantic::Embedder;
use tracing::debug;

use crate::types::{RecommendError, ScoredCandidate};

/// Embeds a query and pulls the nearest catalog items out of the index.
#[derive(Clone)]
pub struct CandidateRetriever {
    catalog: Arc<Catalog>,
    embedder: Arc<dyn Embedder>,
    index: Arc<dyn VectorIndex>,
}

impl CandidateRetriever {
    pub fn new(
        catalog: Arc<Catalog>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            catalog,
            embedder,
            index,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn embedder(&self) -> &dyn Embedder {
        self.embedder.as_ref()
    }

    pub fn index(&self) -> &dyn VectorIndex {
        self.index.as_ref()
    }

    /// Returns up to `n` candidates ordered by descending score, ties in
    /// index order. Repeated ids from the index are dropped. Any embedder,
    /// index or id-mapping failure aborts the whole call.
    pub async fn retrieve(
        &self,
        query: &NormalizedQuery,
        n: usize,
    ) -> Result<Vec<ScoredCandidate<'_>>, RecommendError> {
        let embedding = self.embedder.embed(query.as_str()).await?;
        let hits = self.index.search(&embedding.vector, n)?;

        let mut seen: HashSet<usize> = HashSet::with_capacity(hits.len());
        let mut pool = Vec::with_capacity(hits.len());
        for hit in hits {
            if !seen.insert(hit.id) {
                continue;
            }
            let item = self
                .catalog
                .get(CatalogId(hit.id))
                .ok_or(RecommendError::UnknownCandidate(hit.id))?;
            pool.push(ScoredCandidate {
                item,
                score: hit.score,
            });
        }
        pool.sort_by(|a, b| b.score.total_cmp(&a.score));
        debug!(requested = n, retrieved = pool.len(), "candidate_pool");
        Ok(pool)
    }
}
