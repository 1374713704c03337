use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{SubmissionStore, SubmissionStoreError};
use crate::domain::{NewSubmission, Submission, SubmissionId};

/// Append-only submission log held in memory.
///
/// Records are kept in insertion order, so a stable sort on `created_at`
/// leaves ties in the order they were appended.
#[derive(Debug, Default)]
pub struct InMemorySubmissionStore {
    records: Mutex<Vec<Submission>>,
}

impl InMemorySubmissionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Submission>>, SubmissionStoreError> {
        self.records
            .lock()
            .map_err(|_| SubmissionStoreError::query("submission store lock poisoned"))
    }
}

#[async_trait]
impl SubmissionStore for InMemorySubmissionStore {
    async fn append(&self, record: &NewSubmission) -> Result<Submission, SubmissionStoreError> {
        let stored = record.clone().into_stored(SubmissionId::random());
        self.lock()?.push(stored.clone());
        Ok(stored)
    }

    async fn list_newest_first(&self) -> Result<Vec<Submission>, SubmissionStoreError> {
        let mut records = self.lock()?.clone();
        records.sort_by(|a, b| b.created_at().cmp(&a.created_at()));
        Ok(records)
    }

    async fn ping(&self) -> Result<(), SubmissionStoreError> {
        self.lock().map(|_| ())
    }
}
