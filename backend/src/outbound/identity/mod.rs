//! Federated identity adapters.
//!
//! [`OAuthHttpProvider`] implements the authorisation-code flow against one
//! configured OAuth 2.0 provider.

mod oauth_http;

pub use oauth_http::{OAuthHttpProvider, OAuthProviderConfig};
