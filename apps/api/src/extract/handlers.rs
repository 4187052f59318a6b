use anyhow::Context;
use axum::{extract::Multipart, Json};
use bytes::Bytes;
use serde::Serialize;

use crate::errors::AppError;
use crate::extract::{extract, MediaType};

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResponse {
    pub media_type: MediaType,
    pub text: String,
}

/// POST /api/v1/extract
///
/// Multipart upload with a single `file` part. The part's declared content
/// type selects the parser.
pub async fn handle_extract(mut multipart: Multipart) -> Result<Json<ExtractResponse>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes: Bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;

        // PDF parsing is CPU-bound; keep it off the async workers.
        let (media_type, text) =
            tokio::task::spawn_blocking(move || extract(&bytes, &content_type))
                .await
                .context("Extraction task panicked")??;

        return Ok(Json(ExtractResponse { media_type, text }));
    }

    Err(AppError::Validation(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
