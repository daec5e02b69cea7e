use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::screening::ScreeningError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Screening(#[from] ScreeningError),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Screening(e) => match e {
                ScreeningError::NoRequirements => {
                    (StatusCode::BAD_REQUEST, "NO_REQUIREMENTS", e.to_string())
                }
                ScreeningError::EmptyExport => {
                    (StatusCode::BAD_REQUEST, "NO_RESULTS", e.to_string())
                }
                ScreeningError::Extraction(_) => {
                    tracing::error!("{e}");
                    (StatusCode::BAD_GATEWAY, "EXTRACTION_FAILED", e.to_string())
                }
                ScreeningError::Scoring(_) => {
                    tracing::error!("{e}");
                    (StatusCode::BAD_GATEWAY, "SCORING_FAILED", e.to_string())
                }
                ScreeningError::Csv(inner) => {
                    tracing::error!("CSV error: {inner}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXPORT_ERROR",
                        "The CSV export could not be written".to_string(),
                    )
                }
            },
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (StatusCode::BAD_REQUEST, "LLM_ERROR", msg.clone())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
