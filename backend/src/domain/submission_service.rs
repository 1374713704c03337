//! Submission service: validates drafts and talks to the submission store.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{SubmissionService, SubmissionStore, SubmissionStoreError};
use crate::domain::{Error, Submission, SubmissionDraft};

/// Submission service implementing the driving port.
#[derive(Clone)]
pub struct SubmissionServiceImpl<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> SubmissionServiceImpl<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: SubmissionStoreError) -> Error {
    match error {
        SubmissionStoreError::Connection { message } => {
            Error::service_unavailable("submission store unavailable").with_diagnostic(message)
        }
        SubmissionStoreError::Query { message } => {
            Error::internal("submission store error").with_diagnostic(message)
        }
    }
}

#[async_trait]
impl<S> SubmissionService for SubmissionServiceImpl<S>
where
    S: SubmissionStore + ?Sized,
{
    async fn create(&self, draft: SubmissionDraft) -> Result<Submission, Error> {
        let record = draft
            .validate()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let stored = self.store.append(&record).await.map_err(|err| {
            if let Some(url) = record.attachment.url.as_deref() {
                warn!(file_url = url, "attachment orphaned by failed submission insert");
            }
            map_store_error(err)
        })?;
        info!(
            submission_id = %stored.id(),
            secondary_entries = stored.secondary_entries().len(),
            "submission stored"
        );
        Ok(stored)
    }

    async fn list(&self) -> Result<Vec<Submission>, Error> {
        self.store
            .list_newest_first()
            .await
            .map_err(map_store_error)
    }

    async fn check_store(&self) -> Result<(), Error> {
        self.store.ping().await.map_err(map_store_error)
    }
}
