//! Filesystem-backed [`BlobStore`] scoped to a single root directory.
//!
//! Objects live at `<root>/<namespace>/<name>` and are served back by the
//! application under `<public_base_url>/blobs/<namespace>/<name>`. All file
//! access goes through a `cap-std` directory handle so keys cannot escape the
//! root. Blocking IO runs on the Tokio blocking pool.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use tracing::debug;

use crate::TraceId;
use crate::domain::ports::{BlobKey, BlobStore, BlobStoreError};

/// Route prefix under which stored blobs are served.
pub const BLOB_ROUTE_PREFIX: &str = "/blobs";

/// Blob store writing into a capability-scoped directory.
#[derive(Clone)]
pub struct FilesystemBlobStore {
    root: Arc<Dir>,
    public_base_url: String,
}

impl FilesystemBlobStore {
    /// Open (creating if needed) `root` and serve URLs under
    /// `public_base_url`.
    ///
    /// # Errors
    ///
    /// Returns an IO error when the directory cannot be created or opened.
    pub fn open(root: impl AsRef<Path>, public_base_url: &str) -> io::Result<Self> {
        let root = root.as_ref();
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            root: Arc::new(dir),
            public_base_url: public_base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// Public URL for `key`.
    pub fn url_for(&self, key: &BlobKey) -> String {
        format!("{}{BLOB_ROUTE_PREFIX}/{key}", self.public_base_url)
    }

    async fn run<T, F>(&self, work: F) -> Result<T, BlobStoreError>
    where
        F: FnOnce(&Dir) -> Result<T, BlobStoreError> + Send + 'static,
        T: Send + 'static,
    {
        let root = Arc::clone(&self.root);
        TraceId::in_blocking(move || work(&root))
            .await
            .map_err(|err| BlobStoreError::io(err.to_string()))?
    }
}

fn relative_path(key: &BlobKey) -> PathBuf {
    Path::new(key.namespace()).join(key.name())
}

fn map_io(key: &BlobKey, error: io::Error) -> BlobStoreError {
    match error.kind() {
        io::ErrorKind::NotFound => BlobStoreError::not_found(key.to_string()),
        _ => BlobStoreError::io(error.to_string()),
    }
}

#[async_trait]
impl BlobStore for FilesystemBlobStore {
    async fn put(&self, key: &BlobKey, bytes: Vec<u8>) -> Result<String, BlobStoreError> {
        let owned = key.clone();
        let size = bytes.len();
        self.run(move |root| {
            root.create_dir_all(owned.namespace())
                .map_err(|err| BlobStoreError::io(err.to_string()))?;
            root.write(relative_path(&owned), bytes)
                .map_err(|err| BlobStoreError::io(err.to_string()))
        })
        .await?;
        debug!(%key, size, "blob stored");
        Ok(self.url_for(key))
    }

    async fn get(&self, key: &BlobKey) -> Result<Vec<u8>, BlobStoreError> {
        let owned = key.clone();
        self.run(move |root| root.read(relative_path(&owned)).map_err(|err| map_io(&owned, err)))
            .await
    }
}
