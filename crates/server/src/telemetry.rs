//! Prometheus wiring for the recommender's metrics hooks.

use std::sync::OnceLock;
use std::time::Duration;

use matcher::RecommendMetrics;
use metrics::{counter, histogram};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Installs the global Prometheus recorder once and returns its handle.
///
/// Returns `None` when another recorder already owns the global slot.
pub fn install_prometheus() -> Option<PrometheusHandle> {
    if let Some(existing) = PROMETHEUS_HANDLE.get() {
        return Some(existing.clone());
    }

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            let _ = PROMETHEUS_HANDLE.set(handle);
            tracing::info!("prometheus_recorder_installed");
        }
        Err(err) => {
            tracing::warn!(error = %err, "prometheus_recorder_unavailable");
        }
    }
    PROMETHEUS_HANDLE.get().cloned()
}

/// [`RecommendMetrics`] backed by the `metrics` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct PrometheusRecommendMetrics;

impl RecommendMetrics for PrometheusRecommendMetrics {
    fn record_recommend(&self, latency: Duration, requested: usize, returned: usize, diversify: bool) {
        let mode = if diversify { "diversified" } else { "relevance" };
        counter!("assessrec_recommend_requests_total", "mode" => mode).increment(1);
        histogram!("assessrec_recommend_latency_seconds", "mode" => mode)
            .record(latency.as_secs_f64());
        histogram!("assessrec_recommend_requested_k").record(requested as f64);
        histogram!("assessrec_recommend_returned_items").record(returned as f64);
    }

    fn record_failure(&self, latency: Duration, kind: &'static str) {
        counter!("assessrec_recommend_failures_total", "kind" => kind).increment(1);
        histogram!("assessrec_recommend_failure_latency_seconds").record(latency.as_secs_f64());
    }
}
