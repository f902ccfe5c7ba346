//! API route handlers
//!
//! Routes are organized by functionality:
//!
//! - `health`: Liveness, readiness, and metrics
//! - `details`: Catalog listing and free-text search
//! - `suggest`: Context-based detail suggestion

pub mod details;
pub mod health;
pub mod suggest;

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::response::IntoResponse;
use axum::Json;
use detail_library::Matcher;
use serde_json::json;
use std::sync::Arc;

/// API version and base info
///
/// # Response
///
/// ```json
/// {
///   "success": true,
///   "name": "Detail Library API",
///   "version": "0.1.0",
///   "endpoints": ["..."]
/// }
/// ```
pub async fn api_info() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "name": "Detail Library API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /details",
            "GET /details/search?q=",
            "POST /suggest-detail",
            "GET /health",
            "GET /ready",
            "GET /metrics"
        ]
    }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}

/// Run a catalog-bound matcher call on the blocking pool.
pub(crate) async fn with_matcher<T, E, F>(state: &ServerState, f: F) -> ServerResult<T>
where
    F: FnOnce(&Matcher) -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ServerError> + Send + 'static,
{
    let matcher = Arc::clone(&state.matcher);
    tokio::task::spawn_blocking(move || f(&matcher))
        .await
        .map_err(|e| ServerError::Internal(format!("matcher task failed: {e}")))?
        .map_err(Into::into)
}
