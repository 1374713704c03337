//! Port for federated (OAuth) identity providers.

use async_trait::async_trait;

use crate::domain::{DisplayName, Email};

use super::define_port_error;

define_port_error! {
    /// Errors raised while talking to an external identity provider.
    pub enum IdentityProviderError {
        /// No provider is configured under this name.
        UnknownProvider { provider: String } => "unknown identity provider: {provider}",
        /// The provider could not be reached.
        Transport { message: String } => "identity provider request failed: {message}",
        /// The provider answered with a non-success status.
        Rejected { status: u16, message: String } => "identity provider rejected request ({status}): {message}",
        /// The provider's profile lacked a usable email or name.
        InvalidProfile { message: String } => "identity provider returned an unusable profile: {message}",
    }
}

/// Verified identity returned by a provider after the code exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FederatedIdentity {
    pub email: Email,
    pub display_name: DisplayName,
}

/// OAuth 2.0 authorisation-code flow against an external provider.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FederatedIdentityProvider: Send + Sync {
    /// URL the browser should visit to start sign-in with `provider`.
    fn authorization_url(&self, provider: &str, state: &str) -> Result<String, IdentityProviderError>;

    /// Exchange an authorisation code for the signed-in identity.
    async fn exchange_code(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError>;
}

/// Provider used when federated sign-in is not configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIdentityProvider;

#[async_trait]
impl FederatedIdentityProvider for DisabledIdentityProvider {
    fn authorization_url(&self, provider: &str, _state: &str) -> Result<String, IdentityProviderError> {
        Err(IdentityProviderError::unknown_provider(provider))
    }

    async fn exchange_code(
        &self,
        provider: &str,
        _code: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError> {
        Err(IdentityProviderError::unknown_provider(provider))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn disabled_provider_knows_no_providers() {
        let provider = DisabledIdentityProvider;
        assert_eq!(
            provider.exchange_code("google", "code").await,
            Err(IdentityProviderError::unknown_provider("google"))
        );
        assert!(provider.authorization_url("google", "state").is_err());
    }
}
