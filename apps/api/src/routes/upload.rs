//! Upload handlers: stage the document, run the pipeline off the async
//! executor, render the record as HTML or JSON.

use std::io::Write;

use anyhow::Context;
use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::extraction::{DocumentFormat, ResumeRecord};
use crate::render::{render_index, render_result};
use crate::state::AppState;

const FILE_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// The `file` part of a multipart upload.
#[derive(Debug)]
pub struct UploadedDocument {
    pub file_name: String,
    pub data: Bytes,
}

#[derive(Debug, Serialize)]
pub struct ExtractionResponse {
    pub id: Uuid,
    pub filename: String,
    pub extracted_at: DateTime<Utc>,
    pub record: ResumeRecord,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /
pub async fn handle_index() -> Html<String> {
    Html(render_index(None))
}

/// POST /upload
/// Renders the result page, or the form again with the failure message.
pub async fn handle_upload_form(State(state): State<AppState>, multipart: Multipart) -> Response {
    let outcome = match read_upload(multipart).await {
        Ok(upload) => {
            let file_name = upload.file_name.clone();
            extract_upload(&state, upload)
                .await
                .map(|record| render_result(&file_name, &record))
        }
        Err(e) => Err(e),
    };

    match outcome {
        Ok(html) => Html(html).into_response(),
        Err(e) => (e.status_code(), Html(render_index(Some(&e.public_message())))).into_response(),
    }
}

/// POST /api/v1/resumes/extract
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractionResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let filename = upload.file_name.clone();
    let record = extract_upload(&state, upload).await?;

    Ok(Json(ExtractionResponse {
        id: Uuid::new_v4(),
        filename,
        extracted_at: Utc::now(),
        record,
    }))
}

// ────────────────────────────────────────────────────────────────────────────
// Upload processing
// ────────────────────────────────────────────────────────────────────────────

/// Pulls the `file` part out of the form. Other parts are ignored.
async fn read_upload(mut multipart: Multipart) -> Result<UploadedDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Malformed upload", e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        if file_name.is_empty() {
            return Err(AppError::Validation("No selected file".to_string()));
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;

        return Ok(UploadedDocument { file_name, data });
    }

    Err(AppError::Validation("No file part".to_string()))
}

/// Body limit rejections keep their 413; everything else is a bad request.
fn multipart_error(context: &str, e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("File is too large".to_string())
    } else {
        AppError::Validation(format!("{context}: {e}"))
    }
}

/// Checks the extension, stages the bytes under a unique name in the upload
/// directory and runs the pipeline on a blocking thread. The staged copy is
/// removed when extraction finishes, whether it succeeded or not.
async fn extract_upload(
    state: &AppState,
    upload: UploadedDocument,
) -> Result<ResumeRecord, AppError> {
    let format = DocumentFormat::from_file_name(&upload.file_name).map_err(|e| {
        warn!("Rejected upload '{}': unsupported format", upload.file_name);
        AppError::from(e)
    })?;

    info!(
        "Processing upload '{}' ({} bytes, {:?})",
        upload.file_name,
        upload.data.len(),
        format
    );

    let pipeline = state.pipeline.clone();
    let upload_dir = state.config.upload_dir.clone();

    let result = tokio::task::spawn_blocking(move || -> Result<ResumeRecord, AppError> {
        let mut staged = tempfile::Builder::new()
            .prefix("resume-")
            .suffix(format.extension())
            .tempfile_in(&upload_dir)
            .with_context(|| format!("Failed to stage upload in {}", upload_dir.display()))?;
        staged
            .write_all(&upload.data)
            .context("Failed to write staged upload")?;
        staged.flush().context("Failed to flush staged upload")?;

        Ok(pipeline.process_document(staged.path())?)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))?;

    match &result {
        Ok(record) => info!(
            "Extraction complete: {} of 6 fields populated",
            record.populated_fields()
        ),
        Err(e) => warn!("Extraction failed: {e}"),
    }
    result
}
