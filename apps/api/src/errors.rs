use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisError;
use crate::chat::AssistantError;
use crate::extract::ExtractError;
use crate::store::StoreError;

/// Message shown for every failed analysis, whatever the cause.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please try again.";
pub const UNSUPPORTED_FORMAT_MESSAGE: &str = "Unsupported format. Try PDF or DOCX.";
pub const UNREADABLE_FILE_MESSAGE: &str = "Error parsing file.";
pub const ASSISTANT_UNAVAILABLE_MESSAGE: &str = "Sorry, I am having trouble connecting right now.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    #[error("Assistant error: {0}")]
    Assistant(#[from] AssistantError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Extract(ExtractError::UnsupportedFormat(media_type)) => {
                tracing::info!("Rejected upload with media type '{media_type}'");
                (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FORMAT",
                    UNSUPPORTED_FORMAT_MESSAGE.to_string(),
                )
            }
            AppError::Extract(e @ ExtractError::Unreadable { .. }) => {
                tracing::warn!("{e}");
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "UNREADABLE_FILE",
                    UNREADABLE_FILE_MESSAGE.to_string(),
                )
            }
            AppError::Analysis(e) => {
                tracing::error!("Analysis error: {e}");
                let code = match e {
                    AnalysisError::TransportFailure { .. } => "TRANSPORT_FAILURE",
                    AnalysisError::SchemaViolation { .. } => "SCHEMA_VIOLATION",
                };
                (
                    StatusCode::BAD_GATEWAY,
                    code,
                    ANALYSIS_FAILED_MESSAGE.to_string(),
                )
            }
            AppError::Assistant(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "ASSISTANT_UNAVAILABLE",
                ASSISTANT_UNAVAILABLE_MESSAGE.to_string(),
            ),
            AppError::Store(e) => {
                tracing::error!("Store error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "A storage error occurred".to_string(),
                )
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
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
