//! HTTP error mapping

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("No file part")]
    NoFilePart,

    #[error("No selected file")]
    NoSelectedFile,

    #[error("invalid upload: {0}")]
    BadRequest(String),

    /// The pipeline rejected the upload; the previous snapshot stays in place.
    #[error("Error processing file: {0}")]
    Processing(#[from] crate::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NoFilePart | AppError::NoSelectedFile => {
                (StatusCode::BAD_REQUEST, json!({ "message": self.to_string() }))
            }
            AppError::BadRequest(msg) => (
                StatusCode::BAD_REQUEST,
                json!({ "message": "Invalid upload", "error": msg }),
            ),
            AppError::Processing(err) => {
                tracing::warn!(error = %err, "upload rejected");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Error processing file", "error": err.to_string() }),
                )
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "message": "Internal server error" }),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
