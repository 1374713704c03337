//! Driving port for authentication use-cases.
//!
//! HTTP handlers talk to this port; the implementation owns the credential
//! store, hasher and identity provider wiring.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, Registration, SessionClaims, User};

/// Authentication entry points exposed to inbound adapters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Create a local account.
    ///
    /// Fails with `InvalidRequest` "User already exists" when the email is
    /// taken.
    async fn register(&self, registration: Registration) -> Result<User, Error>;

    /// Check an email/password pair.
    ///
    /// Returns `None` for unknown emails, federated-only accounts and wrong
    /// passwords alike.
    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<SessionClaims>, Error>;

    /// URL that starts federated sign-in with `provider`.
    fn federated_sign_in_url(&self, provider: &str, state: &str) -> Result<String, Error>;

    /// Complete federated sign-in, creating a password-less user on first
    /// login.
    async fn establish_federated_session(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<SessionClaims, Error>;
}
