//! Port abstraction for append-only submission persistence.

use async_trait::async_trait;

use crate::domain::{NewSubmission, Submission};

use super::define_port_error;

define_port_error! {
    /// Errors raised by submission store adapters.
    ///
    /// The message is the underlying store text; it is surfaced to callers
    /// as the response's `error` diagnostic.
    pub enum SubmissionStoreError {
        /// The store could not be reached.
        Connection { message: String } => "{message}",
        /// The store rejected a read or write.
        Query { message: String } => "{message}",
    }
}

/// Persistence port for submissions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Append one record and return it with its assigned id.
    async fn append(&self, record: &NewSubmission) -> Result<Submission, SubmissionStoreError>;

    /// Every stored record, newest `created_at` first; equal timestamps keep
    /// insertion order.
    async fn list_newest_first(&self) -> Result<Vec<Submission>, SubmissionStoreError>;

    /// Cheap reachability check.
    async fn ping(&self) -> Result<(), SubmissionStoreError>;
}
