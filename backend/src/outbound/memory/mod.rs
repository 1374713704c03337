//! In-process adapters used when no database is configured and in tests.
//!
//! Each store guards its data with a `std::sync::Mutex` held only for a
//! single read or append.

mod credential_store;
mod submission_store;

pub use credential_store::InMemoryCredentialStore;
pub use submission_store::InMemorySubmissionStore;
