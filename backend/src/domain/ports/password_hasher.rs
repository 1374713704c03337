//! Port for adaptive password hashing.

use async_trait::async_trait;

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised while hashing or verifying passwords.
    pub enum PasswordHashError {
        /// Hash generation failed.
        Hash { message: String } => "password hashing failed: {message}",
        /// The stored hash could not be parsed or compared.
        Verify { message: String } => "password verification failed: {message}",
    }
}

/// Salted, adaptive password hashing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Produce a salted hash of `password`.
    async fn hash(&self, password: &str) -> Result<PasswordHash, PasswordHashError>;

    /// Compare `password` against a stored hash.
    async fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError>;
}
