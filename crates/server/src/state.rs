use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};
use crate::telemetry::{install_prometheus, PrometheusRecommendMetrics};
use assessrec::{AppConfig, Recommender};
use dashmap::DashMap;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Browser-like agent; some catalog and job sites refuse unknown clients.
const FETCH_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/124.0 Safari/537.36";

/// Shared application state
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Rate limit tracking: API key -> (count, window_start)
    pub rate_limiter: Arc<DashMap<String, (u32, Instant)>>,

    /// Recommender built once at start-up and shared by every request
    pub recommender: Arc<Recommender>,

    /// Client used to fetch pages submitted as `url`
    pub http: reqwest::Client,

    /// Renders `/metrics`; `None` when metrics are disabled
    pub prometheus: Option<PrometheusHandle>,
}

impl ServerState {
    /// Wrap an already-built recommender.
    pub fn new(config: ServerConfig, recommender: Arc<Recommender>) -> ServerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.fetch_timeout())
            .user_agent(FETCH_USER_AGENT)
            .build()
            .map_err(|err| ServerError::Internal(format!("http client: {err}")))?;

        Ok(Self {
            config: Arc::new(config),
            rate_limiter: Arc::new(DashMap::new()),
            recommender,
            http,
            prometheus: None,
        })
    }

    /// Attach a Prometheus handle for `/metrics`.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }

    /// Load the engine config named by `engine_config`, build the recommender
    /// and, when enabled, install the Prometheus recorder it reports to.
    pub async fn from_config(config: ServerConfig) -> ServerResult<Self> {
        let app_config = match &config.engine_config {
            Some(path) => AppConfig::from_file(path)?,
            None => AppConfig::default(),
        };

        let prometheus = if config.metrics_enabled {
            install_prometheus()
        } else {
            None
        };

        let mut recommender = assessrec::build_recommender(&app_config).await?;
        if prometheus.is_some() {
            recommender = recommender.with_metrics(Arc::new(PrometheusRecommendMetrics));
        }

        let state = Self::new(config, Arc::new(recommender))?;
        Ok(match prometheus {
            Some(handle) => state.with_prometheus(handle),
            None => state,
        })
    }

    /// Check if API key is valid
    pub fn is_valid_api_key(&self, key: &str) -> bool {
        self.config.api_keys.contains(key)
    }

    /// Fixed one-minute window per API key.
    pub fn check_rate_limit(&self, key: &str) -> bool {
        let now = Instant::now();
        let window = Duration::from_secs(60);
        let limit = self.config.rate_limit_per_minute;

        let mut entry = self.rate_limiter.entry(key.to_string()).or_insert((0, now));
        let (count, window_start) = entry.value_mut();

        if now.duration_since(*window_start) > window {
            *count = 0;
            *window_start = now;
        }

        if *count >= limit {
            return false;
        }

        *count += 1;
        true
    }
}

/// Server metadata for `/api/v1/metadata`
#[derive(Debug, serde::Serialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub catalog_size: usize,
    pub index_kind: String,
    pub embedding_model: String,
    pub max_k: usize,
}
