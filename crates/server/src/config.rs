use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// Development key accepted only with `allow_demo_key`.
pub const DEMO_API_KEY: &str = "demo-key-12345";

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Server bind address
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Maximum request body size in MB
    #[serde(default = "default_max_body_size_mb")]
    pub max_body_size_mb: usize,

    /// Rate limit: requests per minute per API key
    #[serde(default = "default_rate_limit_per_minute")]
    pub rate_limit_per_minute: u32,

    /// API keys for authentication
    #[serde(default)]
    pub api_keys: HashSet<String>,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub enable_cors: bool,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Metrics endpoint enabled
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,

    /// YAML engine config (catalog, embedder, index, recommender).
    /// Engine defaults apply when unset.
    #[serde(default)]
    pub engine_config: Option<PathBuf>,

    /// Accept the built-in development key when `api_keys` is empty.
    /// Off by default: start-up fails without keys.
    #[serde(default)]
    pub allow_demo_key: bool,

    /// Timeout for fetching a page submitted as `url`
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Pages yielding fewer characters of text than this are rejected
    #[serde(default = "default_min_url_text_chars")]
    pub min_url_text_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            port: default_port(),
            timeout_secs: default_timeout_secs(),
            max_body_size_mb: default_max_body_size_mb(),
            rate_limit_per_minute: default_rate_limit_per_minute(),
            api_keys: HashSet::new(),
            enable_cors: default_true(),
            log_level: default_log_level(),
            metrics_enabled: default_true(),
            engine_config: None,
            allow_demo_key: false,
            fetch_timeout_secs: default_fetch_timeout_secs(),
            min_url_text_chars: default_min_url_text_chars(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from `.env`, an optional `server.*` file and
    /// `ASSESSREC_SERVER__*` environment variables, in increasing priority.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let builder = config::Config::builder()
            .add_source(config::File::with_name("server").required(false))
            .add_source(
                config::Environment::with_prefix("ASSESSREC_SERVER")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("api_keys")
                    .try_parsing(true),
            );

        let mut config: ServerConfig = builder.build()?.try_deserialize()?;
        config.ensure_api_keys()?;
        Ok(config)
    }

    /// Rejects a key-less config unless `allow_demo_key` opts into
    /// [`DEMO_API_KEY`].
    pub fn ensure_api_keys(&mut self) -> anyhow::Result<()> {
        if !self.api_keys.is_empty() {
            return Ok(());
        }
        if !self.allow_demo_key {
            anyhow::bail!(
                "no API keys configured; set ASSESSREC_SERVER__API_KEYS or \
                 ASSESSREC_SERVER__ALLOW_DEMO_KEY=true for local use"
            );
        }
        tracing::warn!(key = DEMO_API_KEY, "demo_api_key_enabled");
        self.api_keys.insert(DEMO_API_KEY.to_string());
        Ok(())
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr_str = format!("{}:{}", self.bind_addr, self.port);
        Ok(addr_str.parse()?)
    }

    /// Get request timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Get max body size in bytes
    pub fn max_body_size(&self) -> usize {
        self.max_body_size_mb * 1024 * 1024
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_body_size_mb() -> usize {
    1
}

fn default_rate_limit_per_minute() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    10
}

fn default_min_url_text_chars() -> usize {
    200
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.timeout_secs, 30);
        assert_eq!(cfg.max_body_size(), 1024 * 1024);
        assert_eq!(cfg.rate_limit_per_minute, 100);
        assert_eq!(cfg.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(cfg.min_url_text_chars, 200);
        assert!(cfg.engine_config.is_none());
        assert!(cfg.enable_cors);
        assert!(cfg.metrics_enabled);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = ServerConfig::default();
        let addr = cfg.socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn missing_api_keys_fail_without_opt_in() {
        let mut cfg = ServerConfig::default();
        assert!(cfg.ensure_api_keys().is_err());
        assert!(cfg.api_keys.is_empty());
    }

    #[test]
    fn demo_key_requires_opt_in() {
        let mut cfg = ServerConfig {
            allow_demo_key: true,
            ..ServerConfig::default()
        };
        cfg.ensure_api_keys().unwrap();
        assert!(cfg.api_keys.contains(DEMO_API_KEY));

        let mut keyed = ServerConfig {
            allow_demo_key: true,
            ..ServerConfig::default()
        };
        keyed.api_keys.insert("prod-key".into());
        keyed.ensure_api_keys().unwrap();
        assert_eq!(keyed.api_keys.len(), 1);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let cfg: ServerConfig =
            serde_json::from_str(r#"{"port": 9000, "engine_config": "engine.yaml"}"#).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.engine_config, Some(PathBuf::from("engine.yaml")));
        assert_eq!(cfg.fetch_timeout_secs, 10);
    }
}
