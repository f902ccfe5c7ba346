use crate::error::{ServerError, ServerResult};
use crate::routes::with_matcher;
use crate::state::ServerState;
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use detail_library::{Detail, Selection, UsageContext, UsageRule};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Suggestion request. Fields are optional here so a missing one is reported
/// with the fixed "Missing required fields" body rather than a parse error.
#[derive(Debug, Default, Deserialize)]
pub struct SuggestRequest {
    #[serde(default)]
    pub host_element: Option<String>,
    #[serde(default)]
    pub adjacent_element: Option<String>,
    #[serde(default)]
    pub exposure: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub success: bool,
    pub suggested_detail: Option<SuggestedDetail>,
    pub explanation: String,
}

/// The selected detail together with the usage rule that matched
#[derive(Debug, Serialize)]
pub struct SuggestedDetail {
    #[serde(flatten)]
    pub detail: Detail,
    pub usage_context: UsageContextBody,
}

#[derive(Debug, Serialize)]
pub struct UsageContextBody {
    pub host_element: String,
    pub adjacent_element: String,
    pub exposure: String,
}

impl From<UsageRule> for UsageContextBody {
    fn from(rule: UsageRule) -> Self {
        Self {
            host_element: rule.host_element,
            adjacent_element: rule.adjacent_element,
            exposure: rule.exposure,
        }
    }
}

/// Suggest the single best detail for a usage context
pub async fn suggest_detail(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<SuggestRequest>, JsonRejection>,
) -> ServerResult<Json<SuggestResponse>> {
    metrics::counter!("detail_requests_total", "route" => "suggest").increment(1);

    let request = match payload {
        Ok(Json(request)) => request,
        Err(JsonRejection::BytesRejection(rejection)) => {
            tracing::warn!(error = %rejection, "suggest body rejected");
            return Err(ServerError::PayloadTooLarge(state.config.max_body_size_mb));
        }
        Err(rejection) => {
            tracing::debug!(error = %rejection, "unusable suggest body");
            SuggestRequest::default()
        }
    };

    let context = match (
        request.host_element.as_deref(),
        request.adjacent_element.as_deref(),
        request.exposure.as_deref(),
    ) {
        (Some(host), Some(adjacent), Some(exposure)) => {
            UsageContext::new(host, adjacent, exposure).ok()
        }
        _ => None,
    };
    let Some(context) = context else {
        metrics::counter!("detail_suggestions_total", "outcome" => "invalid").increment(1);
        return Err(ServerError::MissingFields);
    };

    let selection = with_matcher(&state, move |matcher| matcher.suggest(&context)).await?;

    let response = match selection {
        Selection::Suggested(suggestion) => {
            metrics::counter!("detail_suggestions_total", "outcome" => "suggested").increment(1);
            SuggestResponse {
                success: true,
                suggested_detail: Some(SuggestedDetail {
                    detail: suggestion.detail,
                    usage_context: suggestion.rule.into(),
                }),
                explanation: suggestion.explanation,
            }
        }
        Selection::NoMatch { explanation } => {
            metrics::counter!("detail_suggestions_total", "outcome" => "no_match").increment(1);
            SuggestResponse {
                success: true,
                suggested_detail: None,
                explanation,
            }
        }
    };

    Ok(Json(response))
}
