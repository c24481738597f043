use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// User-facing remedy for every processing failure.
pub const RETRY_MESSAGE: &str = "Please try to upload again";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unreadable document: {0}")]
    UnreadableDocument(String),

    #[error("Parse failure: {0}")]
    ParseFailure(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Stable machine-readable code, also used in per-file error summaries.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::UnreadableDocument(_) => "UNREADABLE_DOCUMENT",
            AppError::ParseFailure(_) => "PARSE_FAILURE",
            AppError::InvalidRecord(_) => "INVALID_RECORD",
            AppError::RenderFailure(_) => "RENDER_FAILURE",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden => "FORBIDDEN",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// The message shown to the user. Processing failures all collapse to the
    /// same retry prompt; the detail only goes to the error log.
    pub fn user_message(&self) -> String {
        match self {
            AppError::UnreadableDocument(_)
            | AppError::ParseFailure(_)
            | AppError::InvalidRecord(_)
            | AppError::RenderFailure(_) => RETRY_MESSAGE.to_string(),
            AppError::NotFound(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Unauthorized => "Invalid username or password".to_string(),
            AppError::Forbidden => "Access denied".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::UnreadableDocument(msg) => {
                tracing::error!("Error reading resume: {msg}");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::ParseFailure(msg) => {
                tracing::error!("Error parsing resume: {msg}");
                StatusCode::BAD_GATEWAY
            }
            AppError::InvalidRecord(msg) => {
                tracing::error!("Invalid parsed result: {msg}");
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::RenderFailure(msg) => {
                tracing::error!("Error generating resume: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": {
                "code": self.code(),
                "message": self.user_message()
            }
        }));

        (status, body).into_response()
    }
}
