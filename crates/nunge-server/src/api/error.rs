use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors surfaced to HTTP clients. The display string is the response's
/// `error` field; internal detail is only logged.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid request format")]
    InvalidRequest(String),

    #[error("Failed to process images")]
    ProcessingFailed(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::InvalidRequest(detail) => {
                tracing::debug!("rejecting request: {}", detail);
                StatusCode::BAD_REQUEST
            }
            AppError::ProcessingFailed(detail) => {
                tracing::error!("image batch failed: {}", detail);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
