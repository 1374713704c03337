//! Attachment upload service.
//!
//! Uploads happen before the submission is created: the browser uploads the
//! file, receives its public URL and then posts the submission JSON. The two
//! writes are not transactional, so a failed submission can leave an orphaned
//! blob behind.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{
    AttachmentContent, AttachmentUploader, BlobKey, BlobStore, BlobStoreError,
};

/// Fixed namespace for submission attachments.
pub const ATTACHMENT_NAMESPACE: &str = "submissions";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// Result of a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoredAttachment {
    /// Original file name as supplied by the browser.
    #[schema(example = "agenda.pdf")]
    pub file_name: String,
    /// Public URL of the stored object.
    #[schema(example = "http://localhost:8080/blobs/submissions/8812764429.pdf")]
    pub file_url: String,
}

/// Extension to keep on the storage key, if the name has a usable one.
fn storage_extension(file_name: &str) -> Option<&str> {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
}

/// Build a collision-resistant storage name: a random `u64` plus the
/// original extension.
///
/// # Examples
/// ```
/// use daybook::domain::storage_name;
///
/// assert_eq!(storage_name("agenda.pdf", 42), "42.pdf");
/// assert_eq!(storage_name("README", 7), "7");
/// ```
pub fn storage_name(file_name: &str, random: u64) -> String {
    match storage_extension(file_name) {
        Some(ext) => format!("{random}.{ext}"),
        None => random.to_string(),
    }
}

/// Content type served for a stored attachment, guessed from its extension.
pub fn content_type_for(name: &str) -> &'static str {
    let Some(ext) = storage_extension(name) else {
        return FALLBACK_CONTENT_TYPE;
    };
    match ext.to_ascii_lowercase().as_str() {
        "pdf" => "application/pdf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "txt" => "text/plain; charset=utf-8",
        _ => FALLBACK_CONTENT_TYPE,
    }
}

/// Attachment service backed by a [`BlobStore`].
#[derive(Clone)]
pub struct AttachmentService<B: ?Sized> {
    blobs: Arc<B>,
}

impl<B: ?Sized> AttachmentService<B> {
    pub fn new(blobs: Arc<B>) -> Self {
        Self { blobs }
    }
}

fn map_blob_error(error: BlobStoreError) -> Error {
    match error {
        BlobStoreError::InvalidKey { .. } | BlobStoreError::NotFound { .. } => {
            Error::not_found("attachment not found")
        }
        BlobStoreError::Io { message } => Error::internal("Error uploading file").with_diagnostic(message),
    }
}

#[async_trait]
impl<B> AttachmentUploader for AttachmentService<B>
where
    B: BlobStore + ?Sized,
{
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredAttachment, Error> {
        if file_name.trim().is_empty() {
            return Err(Error::invalid_request("fileName must not be empty"));
        }
        if bytes.is_empty() {
            return Err(Error::invalid_request("uploaded file is empty"));
        }

        let name = storage_name(file_name, rand::random::<u64>());
        let key = BlobKey::new(ATTACHMENT_NAMESPACE, &name).map_err(map_blob_error)?;
        let size = bytes.len();
        let file_url = self.blobs.put(&key, bytes).await.map_err(|err| {
            warn!(%key, error = %err, "attachment upload failed");
            map_blob_error(err)
        })?;
        info!(%key, size, "attachment stored");
        Ok(StoredAttachment {
            file_name: file_name.to_owned(),
            file_url,
        })
    }

    async fn fetch(&self, key: &str) -> Result<AttachmentContent, Error> {
        let key = BlobKey::new(ATTACHMENT_NAMESPACE, key).map_err(map_blob_error)?;
        let bytes = self.blobs.get(&key).await.map_err(|err| match err {
            BlobStoreError::Io { message } => {
                Error::internal("Error reading file").with_diagnostic(message)
            }
            other => map_blob_error(other),
        })?;
        Ok(AttachmentContent {
            bytes,
            content_type: content_type_for(key.name()),
        })
    }
}
