use crate::error::{ServerError, ServerResult};
use crate::routes::with_matcher;
use crate::state::ServerState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use detail_library::{Detail, SearchQuery};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Full catalog listing
#[derive(Debug, Serialize)]
pub struct DetailListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Detail>,
}

/// Query parameters for detail search
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Search term, matched case-insensitively against title, tags, description
    #[serde(default)]
    pub q: Option<String>,
}

/// Ranked search results; `query` echoes the request verbatim
#[derive(Debug, Serialize)]
pub struct DetailSearchResponse {
    pub success: bool,
    pub query: String,
    pub count: usize,
    pub data: Vec<Detail>,
}

/// List every detail, ascending by id
pub async fn list_details(
    State(state): State<Arc<ServerState>>,
) -> ServerResult<Json<DetailListResponse>> {
    metrics::counter!("detail_requests_total", "route" => "list").increment(1);

    let data = with_matcher(&state, |matcher| matcher.list_details()).await?;

    Ok(Json(DetailListResponse {
        success: true,
        count: data.len(),
        data,
    }))
}

/// Search details by free text
///
/// Results are ordered title hits first, then tag hits, then description
/// hits; ties within a tier are ascending by id.
pub async fn search_details(
    State(state): State<Arc<ServerState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ServerResult<Json<DetailSearchResponse>> {
    metrics::counter!("detail_requests_total", "route" => "search").increment(1);

    let raw = match params {
        Ok(Query(params)) => params.q.unwrap_or_default(),
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unusable search query string");
            return Err(ServerError::MissingQuery);
        }
    };
    let query = SearchQuery::new(&raw).map_err(|_| ServerError::MissingQuery)?;

    let hits = with_matcher(&state, move |matcher| matcher.search(&query)).await?;
    metrics::counter!("detail_search_results_total").increment(hits.len() as u64);

    let data: Vec<Detail> = hits.into_iter().map(|hit| hit.detail).collect();
    Ok(Json(DetailSearchResponse {
        success: true,
        query: raw,
        count: data.len(),
        data,
    }))
}
