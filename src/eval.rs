//! Offline evaluation with Recall@K.
//!
//! Predictions and gold labels are compared as URLs after trimming and
//! lower-casing, so `" HTTPS://x/a "` and `"https://x/a"` are the same item.
use std::collections::HashSet;

use matcher::{RecommendError, Recommender};
use serde::Serialize;
use tracing::{debug, info};

use crate::batch::LabeledQuery;

fn normalize_label(label: &str) -> String {
    label.trim().to_lowercase()
}

/// Share of the (deduplicated) gold set found in the first `k` predictions.
/// Returns 0 when the gold set is empty.
pub fn recall_at_k<P, G>(predicted: &[P], gold: &[G], k: usize) -> f64
where
    P: AsRef<str>,
    G: AsRef<str>,
{
    let gold: HashSet<String> = gold
        .iter()
        .map(|g| normalize_label(g.as_ref()))
        .filter(|g| !g.is_empty())
        .collect();
    if gold.is_empty() {
        return 0.0;
    }
    let top: HashSet<String> = predicted
        .iter()
        .take(k)
        .map(|p| normalize_label(p.as_ref()))
        .collect();
    let hits = top.intersection(&gold).count();
    hits as f64 / gold.len() as f64
}

/// Arithmetic mean, 0 for no values.
pub fn mean_recall(recalls: &[f64]) -> f64 {
    if recalls.is_empty() {
        return 0.0;
    }
    recalls.iter().sum::<f64>() / recalls.len() as f64
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryRecall {
    pub query: String,
    pub recall: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvalReport {
    pub k: usize,
    pub mean_recall: f64,
    pub queries: Vec<QueryRecall>,
}

/// Runs every labeled query through `engine` and scores the URLs it returns.
pub async fn evaluate(
    engine: &Recommender,
    labeled: &[LabeledQuery],
    k: usize,
    diversify: bool,
) -> Result<EvalReport, RecommendError> {
    let mut queries = Vec::with_capacity(labeled.len());
    for item in labeled {
        let recs = engine.recommend(&item.query, k, diversify).await?;
        let urls: Vec<&str> = recs.iter().map(|r| r.url.as_str()).collect();
        let recall = recall_at_k(&urls, &item.gold_urls, k);
        debug!(query = %item.query, recall, "query_scored");
        queries.push(QueryRecall {
            query: item.query.clone(),
            recall,
        });
    }
    let recalls: Vec<f64> = queries.iter().map(|q| q.recall).collect();
    let mean = mean_recall(&recalls);
    info!(queries = queries.len(), k, mean_recall = mean, "evaluation_complete");
    Ok(EvalReport {
        k,
        mean_recall: mean,
        queries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recall_counts_hits_over_gold() {
        let predicted = ["https://x/a", "https://x/b", "https://x/c"];
        let gold = ["https://x/b", "https://x/z"];
        assert_eq!(recall_at_k(&predicted, &gold, 3), 0.5);
    }

    #[test]
    fn recall_ignores_case_and_whitespace() {
        let predicted = ["  HTTPS://X/A "];
        let gold = ["https://x/a"];
        assert_eq!(recall_at_k(&predicted, &gold, 1), 1.0);
    }

    #[test]
    fn recall_only_looks_at_top_k() {
        let predicted = ["https://x/a", "https://x/b"];
        let gold = ["https://x/b"];
        assert_eq!(recall_at_k(&predicted, &gold, 1), 0.0);
        assert_eq!(recall_at_k(&predicted, &gold, 2), 1.0);
    }

    #[test]
    fn empty_gold_is_zero() {
        let predicted = ["https://x/a"];
        let gold: [&str; 0] = [];
        assert_eq!(recall_at_k(&predicted, &gold, 10), 0.0);
        assert_eq!(recall_at_k(&predicted, &["  "], 10), 0.0);
    }

    #[test]
    fn duplicate_gold_counts_once() {
        let predicted = ["https://x/a"];
        let gold = ["https://x/a", "https://x/A "];
        assert_eq!(recall_at_k(&predicted, &gold, 5), 1.0);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean_recall(&[]), 0.0);
        assert_eq!(mean_recall(&[1.0, 0.0, 0.5]), 0.5);
    }
}
