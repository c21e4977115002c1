//! HTTP REST API for the assessment recommender.
//!
//! The server builds one [`Recommender`](assessrec::Recommender) at start-up
//! from the YAML engine config and shares it across requests.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! Public:
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe with catalog and index sizes
//! - `GET /metrics` - Prometheus metrics
//!
//! API key required (`X-API-Key` or `Authorization: Bearer`):
//!
//! - `POST /api/v1/recommend` - `{text?, url?, k?, diversify?}` to
//!   `{count, items: [{name, url, category, score}]}`
//! - `GET /api/v1/metadata` - Version, uptime, catalog size, embedder model

pub mod config;
pub mod error;
pub mod fetch;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
