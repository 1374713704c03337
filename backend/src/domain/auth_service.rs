//! Authentication gateway service.
//!
//! Implements [`AuthGateway`] over the credential store, the password hasher
//! and the federated identity provider.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{
    AuthGateway, CredentialStore, CredentialStoreError, FederatedIdentityProvider,
    IdentityProviderError, PasswordHashError, PasswordHasher,
};
use crate::domain::{
    Email, Error, LoginCredentials, Registration, SessionClaims, User, UserId,
};

/// Message returned when registering an email that is already taken.
pub const USER_EXISTS_MESSAGE: &str = "User already exists";

/// Authentication gateway backed by driven ports.
#[derive(Clone)]
pub struct AuthGatewayService<C: ?Sized, H: ?Sized, P: ?Sized> {
    credentials: Arc<C>,
    hasher: Arc<H>,
    identity: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<C: ?Sized, H: ?Sized, P: ?Sized> AuthGatewayService<C, H, P> {
    /// Create a new service from its collaborators.
    pub fn new(
        credentials: Arc<C>,
        hasher: Arc<H>,
        identity: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            identity,
            clock,
        }
    }
}

fn map_store_error(error: CredentialStoreError) -> Error {
    match error {
        CredentialStoreError::Connection { message } => {
            Error::service_unavailable("credential store unavailable").with_diagnostic(message)
        }
        CredentialStoreError::Query { message } => {
            Error::internal("credential store error").with_diagnostic(message)
        }
        CredentialStoreError::DuplicateEmail { .. } => Error::invalid_request(USER_EXISTS_MESSAGE),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal("password hashing failed").with_diagnostic(error.to_string())
}

fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::UnknownProvider { provider } => {
            Error::not_found(format!("unknown sign-in provider: {provider}"))
        }
        other => Error::unauthorized("federated sign-in failed").with_diagnostic(other.to_string()),
    }
}

#[async_trait]
impl<C, H, P> AuthGateway for AuthGatewayService<C, H, P>
where
    C: CredentialStore + ?Sized,
    H: PasswordHasher + ?Sized,
    P: FederatedIdentityProvider + ?Sized,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        if self
            .credentials
            .find_by_email(registration.email())
            .await
            .map_err(map_store_error)?
            .is_some()
        {
            debug!(email = %registration.email(), "registration rejected: email taken");
            return Err(Error::invalid_request(USER_EXISTS_MESSAGE));
        }

        let hash = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;
        let user = User::new(
            UserId::random(),
            registration.email().clone(),
            registration.name().clone(),
            Some(hash),
            self.clock.utc(),
        );
        // The store's unique constraint settles concurrent registrations.
        self.credentials
            .insert(&user)
            .await
            .map_err(map_store_error)?;
        info!(user_id = %user.id(), "user registered");
        Ok(user)
    }

    async fn authenticate(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<SessionClaims>, Error> {
        // Emails that fail validation cannot belong to a stored user.
        let Ok(email) = Email::new(credentials.email()) else {
            return Ok(None);
        };
        let Some(user) = self
            .credentials
            .find_by_email(&email)
            .await
            .map_err(map_store_error)?
        else {
            return Ok(None);
        };
        let Some(hash) = user.password_hash() else {
            debug!(user_id = %user.id(), "password login attempted for federated-only account");
            return Ok(None);
        };
        let matches = self
            .hasher
            .verify(credentials.password(), hash)
            .await
            .map_err(map_hash_error)?;
        Ok(matches.then(|| SessionClaims::from(&user)))
    }

    fn federated_sign_in_url(&self, provider: &str, state: &str) -> Result<String, Error> {
        self.identity
            .authorization_url(provider, state)
            .map_err(map_identity_error)
    }

    async fn establish_federated_session(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<SessionClaims, Error> {
        let identity = self
            .identity
            .exchange_code(provider, code)
            .await
            .map_err(map_identity_error)?;

        if let Some(existing) = self
            .credentials
            .find_by_email(&identity.email)
            .await
            .map_err(map_store_error)?
        {
            return Ok(SessionClaims::from(&existing));
        }

        let user = User::new(
            UserId::random(),
            identity.email,
            identity.display_name,
            None,
            self.clock.utc(),
        );
        match self.credentials.insert(&user).await {
            Ok(()) => {
                info!(user_id = %user.id(), provider, "federated user created");
                Ok(SessionClaims::from(&user))
            }
            // Lost a race with a concurrent first login for the same email.
            Err(CredentialStoreError::DuplicateEmail { .. }) => {
                warn!(provider, "federated user created concurrently; reloading");
                self.credentials
                    .find_by_email(user.email())
                    .await
                    .map_err(map_store_error)?
                    .map(|stored| SessionClaims::from(&stored))
                    .ok_or_else(|| Error::internal("federated user vanished after insert"))
            }
            Err(other) => Err(map_store_error(other)),
        }
    }
}
