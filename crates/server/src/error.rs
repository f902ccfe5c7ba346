use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use detail_library::{CatalogError, MatchError, REQUIRED_CONTEXT_FIELDS};
use serde_json::json;

pub type ServerResult<T> = Result<T, ServerError>;

/// Server error types
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Search query parameter \"q\" is required")]
    MissingQuery,

    #[error("Missing required fields")]
    MissingFields,

    #[error("{0}")]
    BadRequest(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Payload too large: max {0}MB allowed")]
    PayloadTooLarge(usize),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Route not found")]
    NotFound,
}

impl ServerError {
    /// Get HTTP status code for this error
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::MissingQuery
            | ServerError::MissingFields
            | ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Timeout => StatusCode::REQUEST_TIMEOUT,
            ServerError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ServerError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ServerError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::NotFound => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ServerError::MissingFields => json!({
                "success": false,
                "error": self.to_string(),
                "required": REQUIRED_CONTEXT_FIELDS,
            }),
            ServerError::StoreUnavailable(message) => json!({
                "success": false,
                "error": "Store unavailable",
                "message": message,
            }),
            ServerError::Internal(message) => json!({
                "success": false,
                "error": "Internal server error",
                "message": message,
            }),
            ServerError::MissingQuery
            | ServerError::BadRequest(_)
            | ServerError::Timeout
            | ServerError::PayloadTooLarge(_)
            | ServerError::NotFound => json!({
                "success": false,
                "error": self.to_string(),
            }),
        };

        (status, Json(body)).into_response()
    }
}

impl From<MatchError> for ServerError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::InvalidQuery(message) => ServerError::BadRequest(message),
            MatchError::InvalidConfig(message) => ServerError::Internal(message),
            MatchError::StoreUnavailable(source) => source.into(),
        }
    }
}

impl From<CatalogError> for ServerError {
    fn from(err: CatalogError) -> Self {
        tracing::error!(error = %err, "catalog operation failed");
        ServerError::Internal(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::Value;

    async fn render(err: ServerError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn invalid_query_keeps_its_own_message() {
        let err = ServerError::from(MatchError::InvalidQuery("query must not be empty".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({"success": false, "error": "query must not be empty"})
        );
    }

    #[tokio::test]
    async fn invalid_config_is_internal() {
        let err = ServerError::from(MatchError::InvalidConfig("host weight must be greater than zero".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["message"], "host weight must be greater than zero");
    }

    #[tokio::test]
    async fn store_failure_is_internal_with_message() {
        let err = ServerError::from(MatchError::from(CatalogError::unavailable("disk gone")));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "store unavailable: disk gone");
    }
}
