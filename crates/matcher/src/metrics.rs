//! Metrics hooks for the recommender.
//!
//! A `RecommendMetrics` implementation is handed to the engine with
//! `Recommender::with_metrics`; each engine instance reports to its own
//! recorder so tests and embedders never share global state.
use std::time::Duration;

/// Metrics observer for recommend calls.
pub trait RecommendMetrics: Send + Sync {
    /// Record a successful call.
    ///
    /// `requested` is the `k` the engine was asked for and `returned` the
    /// length of the list it produced.
    fn record_recommend(&self, latency: Duration, requested: usize, returned: usize, diversify: bool);

    /// Record a failed call. `kind` is [`RecommendError::kind`](crate::RecommendError::kind).
    fn record_failure(&self, latency: Duration, kind: &'static str) {
        let _ = (latency, kind);
    }
}
