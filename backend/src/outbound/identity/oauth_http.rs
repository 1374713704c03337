//! Reqwest-backed OAuth 2.0 identity provider adapter.
//!
//! Owns transport details only: authorisation URL construction, the token
//! exchange, the userinfo lookup and mapping provider failures onto
//! [`IdentityProviderError`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Deserialize;

use crate::domain::ports::{FederatedIdentity, FederatedIdentityProvider, IdentityProviderError};
use crate::domain::{DISPLAY_NAME_MAX, DisplayName, Email};

const DEFAULT_SCOPES: &str = "openid email profile";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for one OAuth provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthProviderConfig {
    /// Path segment identifying the provider, e.g. `oauth` in
    /// `/api/auth/signin/oauth`.
    pub name: String,
    pub client_id: String,
    pub client_secret: String,
    pub authorize_url: Url,
    pub token_url: Url,
    pub userinfo_url: Url,
    /// Callback URL registered with the provider.
    pub redirect_url: String,
    pub scopes: String,
    pub timeout: Duration,
}

impl OAuthProviderConfig {
    /// Settings with the default scopes and request timeout.
    pub fn new(
        name: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        endpoints: [Url; 3],
        redirect_url: impl Into<String>,
    ) -> Self {
        let [authorize_url, token_url, userinfo_url] = endpoints;
        Self {
            name: name.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            authorize_url,
            token_url,
            userinfo_url,
            redirect_url: redirect_url.into(),
            scopes: DEFAULT_SCOPES.to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    email: Option<String>,
    name: Option<String>,
    email_verified: Option<bool>,
}

/// OAuth provider adapter.
pub struct OAuthHttpProvider {
    client: Client,
    config: OAuthProviderConfig,
}

impl OAuthHttpProvider {
    /// Build an adapter using a reqwest client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: OAuthProviderConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    fn ensure_provider(&self, provider: &str) -> Result<(), IdentityProviderError> {
        if provider == self.config.name {
            Ok(())
        } else {
            Err(IdentityProviderError::unknown_provider(provider))
        }
    }

    async fn fetch_token(&self, code: &str) -> Result<String, IdentityProviderError> {
        let response = self
            .client
            .post(self.config.token_url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("redirect_uri", self.config.redirect_url.as_str()),
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(map_transport_error)?;
        let token: TokenResponse = decode(response).await?;
        Ok(token.access_token)
    }

    async fn fetch_profile(&self, access_token: &str) -> Result<UserInfo, IdentityProviderError> {
        let response = self
            .client
            .get(self.config.userinfo_url.clone())
            .bearer_auth(access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;
        decode(response).await
    }
}

#[async_trait]
impl FederatedIdentityProvider for OAuthHttpProvider {
    fn authorization_url(&self, provider: &str, state: &str) -> Result<String, IdentityProviderError> {
        self.ensure_provider(provider)?;
        let mut url = self.config.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_url)
            .append_pair("scope", &self.config.scopes)
            .append_pair("state", state);
        Ok(url.into())
    }

    async fn exchange_code(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError> {
        self.ensure_provider(provider)?;
        let access_token = self.fetch_token(code).await?;
        let profile = self.fetch_profile(&access_token).await?;
        identity_from_profile(profile)
    }
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, IdentityProviderError> {
    let status = response.status();
    let body = response.bytes().await.map_err(map_transport_error)?;
    if !status.is_success() {
        return Err(map_status_error(status, body.as_ref()));
    }
    serde_json::from_slice(&body).map_err(|error| {
        IdentityProviderError::invalid_profile(format!("invalid provider JSON payload: {error}"))
    })
}

fn identity_from_profile(profile: UserInfo) -> Result<FederatedIdentity, IdentityProviderError> {
    if profile.email_verified == Some(false) {
        return Err(IdentityProviderError::invalid_profile("email address is not verified"));
    }
    let raw_email = profile
        .email
        .ok_or_else(|| IdentityProviderError::invalid_profile("profile has no email"))?;
    let email = Email::new(raw_email.as_str())
        .map_err(|err| IdentityProviderError::invalid_profile(err.to_string()))?;

    let fallback = raw_email.split('@').next().unwrap_or_default().to_owned();
    let name = profile
        .name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(fallback);
    let name: String = name.trim().chars().take(DISPLAY_NAME_MAX).collect();
    let display_name = DisplayName::new(name)
        .map_err(|err| IdentityProviderError::invalid_profile(err.to_string()))?;

    Ok(FederatedIdentity {
        email,
        display_name,
    })
}

fn map_transport_error(error: reqwest::Error) -> IdentityProviderError {
    IdentityProviderError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> IdentityProviderError {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview: String = compact.chars().take(PREVIEW_CHAR_LIMIT).collect();
    IdentityProviderError::rejected(status.as_u16(), preview)
}
