use crate::error::{ServerError, ServerResult};
use crate::routes::with_matcher;
use crate::state::ServerState;
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::Json;
use chrono::SecondsFormat;
use serde_json::json;
use std::sync::Arc;
use std::time::SystemTime;

/// Global server start time for uptime calculation
static SERVER_START_TIME: once_cell::sync::Lazy<SystemTime> =
    once_cell::sync::Lazy::new(SystemTime::now);

fn uptime_seconds() -> u64 {
    SERVER_START_TIME
        .elapsed()
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Health check endpoint (liveness). Never touches the store.
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "Detail Library API is running",
        "timestamp": chrono::Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

/// Readiness check endpoint
/// Returns 200 once the catalog answers a read, 503 otherwise
pub async fn readiness_check(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<impl IntoResponse> {
    let details = with_matcher(&state, |matcher| {
        matcher
            .catalog()
            .list_all()
            .map(|details| details.len())
            .map_err(|e| {
                tracing::warn!(error = %e, "readiness probe failed");
                ServerError::StoreUnavailable(e.to_string())
            })
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "status": "ready",
        "details": details,
        "uptime_seconds": uptime_seconds(),
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<ServerState>>) -> ServerResult<impl IntoResponse> {
    match (&state.metrics, state.config.metrics_enabled) {
        (Some(handle), true) => Ok((
            [(CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )),
        _ => Err(ServerError::NotFound),
    }
}
