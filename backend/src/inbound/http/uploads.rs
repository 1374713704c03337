//! Attachment upload and download handlers.
//!
//! ```text
//! POST /api/uploads?fileName=agenda.pdf   (raw body bytes)
//! GET  /blobs/submissions/{key}
//! ```
//!
//! The browser uploads the file first and then includes the returned
//! `fileName`/`fileUrl` in the submission it posts to `/api/data`.

use actix_web::{HttpResponse, get, http::header, post, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::error::ErrorDto;
use crate::domain::{Error, StoredAttachment};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Query string of the upload endpoint.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    /// Original file name, used for the stored extension and link text.
    pub file_name: Option<String>,
}

/// Store an attachment and return its public URL.
#[utoipa::path(
    post,
    path = "/api/uploads",
    params(UploadQuery),
    request_body(content = String, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Attachment stored", body = StoredAttachment),
        (status = 400, description = "Missing name or empty body", body = ErrorDto),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 413, description = "Attachment too large"),
        (status = 500, description = "Blob store failure", body = ErrorDto)
    ),
    tags = ["uploads"],
    operation_id = "uploadAttachment"
)]
#[post("/api/uploads")]
pub async fn upload(
    state: web::Data<HttpState>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> ApiResult<HttpResponse> {
    let file_name = query
        .into_inner()
        .file_name
        .ok_or_else(|| Error::invalid_request("fileName is required"))?;
    let stored = state.attachments.upload(&file_name, body.to_vec()).await?;
    Ok(HttpResponse::Created().json(stored))
}

/// Serve an uploaded attachment.
#[utoipa::path(
    get,
    path = "/blobs/submissions/{key}",
    params(("key" = String, Path, description = "Storage key, e.g. 8812764429.pdf")),
    responses(
        (status = 200, description = "Attachment bytes"),
        (status = 404, description = "No such attachment", body = ErrorDto)
    ),
    tags = ["uploads"],
    operation_id = "downloadAttachment",
    security([])
)]
#[get("/blobs/submissions/{key}")]
pub async fn download(
    state: web::Data<HttpState>,
    key: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let content = state.attachments.fetch(&key).await?;
    Ok(HttpResponse::Ok()
        .insert_header((header::CONTENT_TYPE, content.content_type))
        .insert_header((header::X_CONTENT_TYPE_OPTIONS, "nosniff"))
        .body(content.bytes))
}
