//! Port abstraction for persisting user credentials.

use async_trait::async_trait;

use crate::domain::{Email, User};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential store adapters.
    pub enum CredentialStoreError {
        /// The store could not be reached.
        Connection { message: String } => "credential store connection failed: {message}",
        /// A query or insert failed.
        Query { message: String } => "credential store query failed: {message}",
        /// The email is already registered.
        DuplicateEmail { email: String } => "a user with email {email} already exists",
    }
}

/// Persistence port for [`User`] records.
///
/// Lookups match the stored email exactly, including case.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Fetch the user registered under `email`, if any.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, CredentialStoreError>;

    /// Insert a new user.
    ///
    /// Fails with [`CredentialStoreError::DuplicateEmail`] when the email is
    /// already taken.
    async fn insert(&self, user: &User) -> Result<(), CredentialStoreError>;
}
