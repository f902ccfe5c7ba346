//! Detail Library Server - HTTP REST API for construction detail lookup
//!
//! This crate exposes the detail catalog and matcher over HTTP:
//!
//! - **Listing**: every detail in id order
//! - **Search**: tiered free-text search (title, then tags, then description)
//! - **Suggestion**: best detail for a host/adjacent/exposure context, with a
//!   templated explanation
//! - **Health & Metrics**: liveness/readiness probes and Prometheus metrics
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
//! - `GET /` - API information
//! - `GET /details` - List all details
//! - `GET /details/search?q=<term>` - Search details
//! - `POST /suggest-detail` - Suggest a detail for a usage context
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (reads the catalog)
//! - `GET /metrics` - Prometheus metrics
//!
//! Every JSON body carries a `success` boolean; errors add an `error`
//! summary and, for server-side failures, a `message`.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
