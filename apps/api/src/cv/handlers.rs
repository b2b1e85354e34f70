use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::auth::AdminIdentity;
use crate::cv::blob_store::BlobId;
use crate::cv::service::{too_large, CvStatus, UploadRequest, PDF_CONTENT_TYPE};
use crate::errors::AppError;
use crate::state::AppState;

/// Name of the multipart field carrying the file.
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub file_id: BlobId,
    pub filename: String,
    pub size: i64,
}

/// GET /api/v1/cv/status
pub async fn handle_status(
    _admin: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<CvStatus>, AppError> {
    Ok(Json(state.cv.status().await?))
}

/// POST /api/v1/cv/upload
pub async fn handle_upload(
    admin: AdminIdentity,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let request = read_file_field(&mut multipart, state.config.max_upload_bytes).await?;

    // The replaced blob is cleaned up in the background.
    let uploaded = state.cv.upload(&admin, request).await?;

    Ok(Json(UploadResponse {
        file_id: uploaded.metadata.file_id,
        filename: uploaded.metadata.filename,
        size: uploaded.metadata.size,
    }))
}

/// DELETE /api/v1/cv
pub async fn handle_delete(
    admin: AdminIdentity,
    State(state): State<AppState>,
) -> Result<Json<Value>, AppError> {
    state.cv.delete(&admin).await?;
    Ok(Json(json!({ "message": "CV deleted successfully" })))
}

/// GET /api/v1/cv/download
pub async fn handle_download(State(state): State<AppState>) -> Result<Response, AppError> {
    let download = state.cv.download().await?;

    Ok((
        [
            (header::CONTENT_TYPE, PDF_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                attachment_disposition(&download.filename),
            ),
            (header::CONTENT_LENGTH, download.data.len().to_string()),
        ],
        download.data,
    )
        .into_response())
}

async fn read_file_field(
    multipart: &mut Multipart,
    max_bytes: usize,
) -> Result<UploadRequest, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, "Malformed multipart body", max_bytes))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e, "Failed to read uploaded file", max_bytes))?;

        return Ok(UploadRequest {
            data,
            filename,
            content_type,
        });
    }

    Err(AppError::Validation("No file provided".to_string()))
}

/// Body-limit overruns surface as 413; anything else is a bad request.
fn multipart_error(err: MultipartError, context: &str, max_bytes: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return too_large(max_bytes);
    }
    AppError::Validation(format!("{context}: {}", err.body_text()))
}

/// Builds an `attachment` disposition with an ASCII-only quoted filename.
fn attachment_disposition(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect();
    format!("attachment; filename=\"{safe}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_quotes_plain_names() {
        assert_eq!(
            attachment_disposition("Jane Doe CV.pdf"),
            "attachment; filename=\"Jane Doe CV.pdf\""
        );
    }

    #[test]
    fn test_disposition_escapes_hostile_names() {
        assert_eq!(
            attachment_disposition("a\"b\\c\r\nd.pdf"),
            "attachment; filename=\"a_b_c__d.pdf\""
        );
        assert_eq!(attachment_disposition("Résumé.pdf"), "attachment; filename=\"R_sum_.pdf\"");
    }
}
