use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, HeaderValue},
    response::Response,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::{
    error::{ApiError, ApiResult},
    state::AppState,
};

/// Upload body cap, applied to the upload route
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentResponse {
    pub id: String,
    pub name: String,
    pub mime: String,
    pub size: u64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub attachments: Vec<AttachmentResponse>,
}

struct UploadedFile {
    filename: Option<String>,
    content_type: Option<String>,
    bytes: Vec<u8>,
}

/// Upload files to a chat (multipart fields `chat_id` and repeated `files`)
#[utoipa::path(
    post,
    path = "/api/upload",
    responses(
        (status = 200, description = "Stored attachments", body = UploadResponse),
        (status = 400, description = "Missing chat_id or malformed multipart body")
    ),
    tag = "attachments"
)]
pub async fn upload_files(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> ApiResult<Json<UploadResponse>> {
    let mut chat_id: Option<String> = None;
    let mut files: Vec<UploadedFile> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {e}")))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("chat_id") => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read chat_id: {e}")))?;
                chat_id = Some(value.trim().to_string()).filter(|id| !id.is_empty());
            }
            Some("files") | Some("file") => {
                let filename = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {e}")))?;
                files.push(UploadedFile {
                    filename,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => tracing::debug!(field = ?other, "Ignoring unknown upload field"),
        }
    }

    let chat_id = chat_id.ok_or_else(|| ApiError::BadRequest("chat_id is required".to_string()))?;

    let mut attachments = Vec::with_capacity(files.len());
    for file in files {
        let stored = state
            .persist
            .attachments()
            .store_upload(
                &chat_id,
                file.filename.as_deref(),
                file.content_type.as_deref(),
                file.bytes,
            )
            .await?;
        let r = stored.to_ref();
        attachments.push(AttachmentResponse {
            id: r.id,
            name: r.name,
            mime: r.mime,
            size: r.size,
        });
    }

    Ok(Json(UploadResponse { attachments }))
}

/// Download an attachment inline
#[utoipa::path(
    get,
    path = "/api/attachment/{id}",
    params(
        ("id" = String, Path, description = "Attachment ID")
    ),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "Attachment not found")
    ),
    tag = "attachments"
)]
pub async fn get_attachment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Response> {
    let blob = match state.persist.attachments().open(&id).await {
        Ok(Some(blob)) => blob,
        Ok(None) => return Err(ApiError::NotFound),
        Err(e) => {
            tracing::warn!(attachment_id = %id, error = %e, "Download failed");
            return Err(ApiError::NotFound);
        }
    };

    let content_type = HeaderValue::from_str(&blob.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_str(&format!(
        "inline; filename=\"{}\"",
        sanitize_filename(&blob.filename)
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("inline"));

    let mut response = Response::new(Body::from(blob.bytes));
    response.headers_mut().insert(header::CONTENT_TYPE, content_type);
    response.headers_mut().insert(header::CONTENT_DISPOSITION, disposition);
    Ok(response)
}

/// Keep the filename inside its quoted header parameter
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
        .collect()
}
