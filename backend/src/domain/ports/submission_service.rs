//! Driving port for the submission use-cases.

use async_trait::async_trait;

use crate::domain::{Error, Submission, SubmissionDraft};

/// Create and list submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionService: Send + Sync {
    /// Validate and append one submission.
    async fn create(&self, draft: SubmissionDraft) -> Result<Submission, Error>;

    /// All submissions, newest first.
    async fn list(&self) -> Result<Vec<Submission>, Error>;

    /// Verify the submission store is reachable.
    async fn check_store(&self) -> Result<(), Error>;
}
