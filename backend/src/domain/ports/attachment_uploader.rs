//! Driving port for attachment uploads and downloads.

use async_trait::async_trait;

use crate::domain::{Error, StoredAttachment};

/// Attachment bytes read back from the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentContent {
    pub bytes: Vec<u8>,
    pub content_type: &'static str,
}

/// Upload attachments ahead of a submission and serve them back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttachmentUploader: Send + Sync {
    /// Store the file under a fresh key and return its public URL.
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<StoredAttachment, Error>;

    /// Read an uploaded attachment by its key within the attachment namespace.
    async fn fetch(&self, key: &str) -> Result<AttachmentContent, Error>;
}
