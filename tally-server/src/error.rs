//! Error types for tally-server

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Missing or wrong admin password (401)
    #[error("Unauthorized")]
    Unauthorized,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// tally-common error; carries the 404/409 cases
    #[error(transparent)]
    Common(#[from] tally_common::Error),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use tally_common::Error as CommonError;

        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::Io(ref err) => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
            ApiError::Common(err) => match err {
                CommonError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
                CommonError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
                CommonError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                other => (StatusCode::INTERNAL_SERVER_ERROR, other.to_string()),
            },
        };

        if status.is_server_error() {
            tracing::error!(%status, "Request failed: {}", message);
        }

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
