//! Application settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a `DAYBOOK_*` environment variable, a
//! command-line flag or a configuration file entry. Accessors apply defaults
//! and validate values so the server wiring only sees usable settings.

use std::net::SocketAddr;
use std::path::PathBuf;

use ortho_config::OrthoConfig;
use reqwest::Url;
use serde::Deserialize;

use crate::inbound::http::DEFAULT_MAX_UPLOAD_BYTES;
use crate::middleware::ProtectedRoutes;
use crate::outbound::hashing::DEFAULT_BCRYPT_COST;
use crate::outbound::identity::OAuthProviderConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_BLOB_ROOT: &str = "./var/blobs";
const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";
const BCRYPT_COST_RANGE: std::ops::RangeInclusive<u32> = 4..=31;

/// Provider name used in the sign-in and callback paths.
pub const OAUTH_PROVIDER_NAME: &str = "oauth";

/// Invalid or incomplete settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
    #[error("bcrypt cost {value} is outside {min}..={max}")]
    BcryptCost { value: u32, min: u32, max: u32 },
    #[error("{field} is required when DAYBOOK_OAUTH_CLIENT_ID is set")]
    MissingOAuthField { field: &'static str },
    #[error("{field} is not a valid URL: {message}")]
    InvalidUrl { field: &'static str, message: String },
}

/// Server settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "DAYBOOK")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; in-memory stores are used when absent.
    pub database_url: Option<String>,
    /// Directory holding uploaded attachments.
    pub blob_root: Option<PathBuf>,
    /// Externally visible origin used to build attachment URLs.
    pub public_base_url: Option<String>,
    /// bcrypt work factor for new password hashes.
    pub bcrypt_cost: Option<u32>,
    /// Largest accepted upload body in bytes.
    pub max_upload_bytes: Option<usize>,
    /// Comma-separated path prefixes requiring a session.
    pub protected_prefixes: Option<String>,
    /// Comma-separated path prefixes exempt from the session guard.
    pub public_prefixes: Option<String>,
    pub oauth_client_id: Option<String>,
    pub oauth_client_secret: Option<String>,
    pub oauth_authorize_url: Option<String>,
    pub oauth_token_url: Option<String>,
    pub oauth_userinfo_url: Option<String>,
    /// Defaults to `<public_base_url>/api/auth/callback/oauth`.
    pub oauth_redirect_url: Option<String>,
}

fn split_prefixes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|prefix| !prefix.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_url(field: &'static str, raw: &str) -> Result<Url, SettingsError> {
    Url::parse(raw.trim()).map_err(|err| SettingsError::InvalidUrl {
        field,
        message: err.to_string(),
    })
}

fn required<'a>(field: &'static str, value: Option<&'a String>) -> Result<&'a str, SettingsError> {
    value
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or(SettingsError::MissingOAuthField { field })
}

impl AppSettings {
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the address does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    pub fn blob_root(&self) -> PathBuf {
        self.blob_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BLOB_ROOT))
    }

    /// Public origin without a trailing slash.
    pub fn public_base_url(&self) -> &str {
        self.public_base_url
            .as_deref()
            .unwrap_or(DEFAULT_PUBLIC_BASE_URL)
            .trim_end_matches('/')
    }

    /// # Errors
    ///
    /// Returns [`SettingsError::BcryptCost`] outside bcrypt's supported range.
    pub fn bcrypt_cost(&self) -> Result<u32, SettingsError> {
        let cost = self.bcrypt_cost.unwrap_or(DEFAULT_BCRYPT_COST);
        if BCRYPT_COST_RANGE.contains(&cost) {
            Ok(cost)
        } else {
            Err(SettingsError::BcryptCost {
                value: cost,
                min: *BCRYPT_COST_RANGE.start(),
                max: *BCRYPT_COST_RANGE.end(),
            })
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_bytes.unwrap_or(DEFAULT_MAX_UPLOAD_BYTES)
    }

    /// Guard rules: defaults with any configured prefix lists swapped in.
    pub fn protected_routes(&self) -> ProtectedRoutes {
        let mut routes = ProtectedRoutes::default();
        if let Some(raw) = self.protected_prefixes.as_deref() {
            routes = routes.with_protected(split_prefixes(raw));
        }
        if let Some(raw) = self.public_prefixes.as_deref() {
            routes = routes.with_public(split_prefixes(raw));
        }
        routes
    }

    /// Federated provider settings, or `None` when sign-in is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error when a client id is configured but another required
    /// field is missing or a URL is malformed.
    pub fn oauth_provider(&self) -> Result<Option<OAuthProviderConfig>, SettingsError> {
        let Some(client_id) = self
            .oauth_client_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
        else {
            return Ok(None);
        };

        let secret = required("DAYBOOK_OAUTH_CLIENT_SECRET", self.oauth_client_secret.as_ref())?;
        let authorize = parse_url(
            "DAYBOOK_OAUTH_AUTHORIZE_URL",
            required("DAYBOOK_OAUTH_AUTHORIZE_URL", self.oauth_authorize_url.as_ref())?,
        )?;
        let token = parse_url(
            "DAYBOOK_OAUTH_TOKEN_URL",
            required("DAYBOOK_OAUTH_TOKEN_URL", self.oauth_token_url.as_ref())?,
        )?;
        let userinfo = parse_url(
            "DAYBOOK_OAUTH_USERINFO_URL",
            required("DAYBOOK_OAUTH_USERINFO_URL", self.oauth_userinfo_url.as_ref())?,
        )?;
        let redirect = match self.oauth_redirect_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => parse_url("DAYBOOK_OAUTH_REDIRECT_URL", url)?.into(),
            _ => format!(
                "{}/api/auth/callback/{OAUTH_PROVIDER_NAME}",
                self.public_base_url()
            ),
        };

        Ok(Some(OAuthProviderConfig::new(
            OAUTH_PROVIDER_NAME,
            client_id,
            secret,
            [authorize, token, userinfo],
            redirect,
        )))
    }
}
