use std::sync::Arc;
use std::time::Instant;

use canonical::{normalize_query, NormalizedQuery};
use index::VectorIndex;
use ingest::Catalog;
use semantic::Embedder;
use serde::Serialize;
use tracing::{debug, info, info_span, warn, Instrument};

use crate::assemble::assemble;
use crate::diversify::{select, top_k};
use crate::intent::{IntentClassifier, IntentSignals, KeywordIntentClassifier};
use crate::metrics::RecommendMetrics;
use crate::quota::{QuotaMap, QuotaPlanner};
use crate::retriever::CandidateRetriever;
use crate::types::{RecommendConfig, RecommendError, Recommendation};


/// Intent signals and category quotas derived from one query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryPlan {
    pub query: NormalizedQuery,
    pub signals: IntentSignals,
    pub quotas: QuotaMap,
}

/// A recommendation list together with how it was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendOutcome {
    /// `None` when diversification was off.
    pub plan: Option<QueryPlan>,
    /// Number of candidates requested from the index.
    pub pool_size: usize,
    /// Number of distinct candidates the index actually returned.
    pub retrieved: usize,
    pub items: Vec<Recommendation>,
}

/// Recommendation engine: normalize, classify, plan quotas, retrieve,
/// select and assemble.
///
/// Everything inside is read-only after construction, so one instance can
/// serve concurrent requests behind an `Arc`.
pub struct Recommender {
    retriever: CandidateRetriever,
    classifier: Arc<dyn IntentClassifier>,
    planner: QuotaPlanner,
    config: RecommendConfig,
    metrics: Option<Arc<dyn RecommendMetrics>>,
}

impl Recommender {
    /// Builds an engine with the default keyword classifier and quota rules.
    ///
    /// Row `i` of `index` must hold the embedding of catalog item `i`.
    pub fn new(
        catalog: Arc<Catalog>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
        config: RecommendConfig,
    ) -> Result<Self, RecommendError> {
        config.validate()?;
        if index.len() != catalog.len() {
            return Err(RecommendError::InvalidConfig(format!(
                "index holds {} vectors but the catalog has {} items",
                index.len(),
                catalog.len()
            )));
        }
        Ok(Self {
            retriever: CandidateRetriever::new(catalog, embedder, index),
            classifier: Arc::new(KeywordIntentClassifier::default()),
            planner: QuotaPlanner::default(),
            config,
            metrics: None,
        })
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn IntentClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_planner(mut self, planner: QuotaPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn RecommendMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &RecommendConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        self.retriever.catalog()
    }

    pub fn model_name(&self) -> &str {
        self.retriever.embedder().model_name()
    }

    pub fn index_kind(&self) -> &'static str {
        self.retriever.index().kind()
    }

    /// Number of vectors held by the index.
    pub fn index_len(&self) -> usize {
        self.retriever.index().len()
    }

    /// Classifies `query` and plans its quotas without touching the index.
    pub fn plan(&self, query: &str) -> QueryPlan {
        self.plan_normalized(normalize_query(Some(query)))
    }

    fn plan_normalized(&self, query: NormalizedQuery) -> QueryPlan {
        let signals = self.classifier.classify(query.as_str());
        let quotas = self.planner.plan(&signals);
        QueryPlan {
            query,
            signals,
            quotas,
        }
    }

    /// Returns up to `k` recommendations for `query`.
    ///
    /// The query is used as given: callers that need `k` clamped or empty
    /// input rejected do so before calling.
    pub async fn recommend(
        &self,
        query: &str,
        k: usize,
        diversify: bool,
    ) -> Result<Vec<Recommendation>, RecommendError> {
        Ok(self.recommend_detailed(query, k, diversify).await?.items)
    }

    /// Like [`recommend`](Self::recommend) but also reports the plan and
    /// pool sizes.
    pub async fn recommend_detailed(
        &self,
        query: &str,
        k: usize,
        diversify: bool,
    ) -> Result<RecommendOutcome, RecommendError> {
        let span = info_span!("matcher.recommend", k, diversify);
        async move {
            let start = Instant::now();
            let result = self.run(query, k, diversify).await;
            let latency = start.elapsed();

            match &result {
                Ok(outcome) => {
                    info!(
                        returned = outcome.items.len(),
                        retrieved = outcome.retrieved,
                        latency_ms = latency.as_millis() as u64,
                        "recommend_complete"
                    );
                    if let Some(metrics) = &self.metrics {
                        metrics.record_recommend(latency, k, outcome.items.len(), diversify);
                    }
                }
                Err(err) => {
                    warn!(error = %err, kind = err.kind(), "recommend_failure");
                    if let Some(metrics) = &self.metrics {
                        metrics.record_failure(latency, err.kind());
                    }
                }
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run(
        &self,
        raw: &str,
        k: usize,
        diversify: bool,
    ) -> Result<RecommendOutcome, RecommendError> {
        let query = normalize_query(Some(raw));
        let pool_size = self.config.pool_size(k);
        let plan = diversify.then(|| self.plan_normalized(query.clone()));
        if let Some(plan) = &plan {
            debug!(signals = ?plan.signals, quotas = ?plan.quotas, "query_plan");
        }

        let pool = self.retriever.retrieve(&query, pool_size).await?;
        let selections = match &plan {
            Some(plan) => select(&pool, &plan.quotas, k),
            None => top_k(&pool, k),
        };

        Ok(RecommendOutcome {
            plan,
            pool_size,
            retrieved: pool.len(),
            items: assemble(&selections, k),
        })
    }
}
