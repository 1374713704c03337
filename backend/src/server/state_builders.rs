//! Builders wiring adapters into the driving ports held by [`HttpState`].
//!
//! A database pool selects the Diesel stores; without one the in-memory
//! stores are used so the server runs locally with no infrastructure.

use std::io;
use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use daybook::config::AppSettings;
use daybook::domain::ports::{
    CredentialStore, DisabledIdentityProvider, FederatedIdentityProvider, SubmissionStore,
};
use daybook::domain::{AttachmentService, AuthGatewayService, SubmissionServiceImpl};
use daybook::inbound::http::state::HttpState;
use daybook::outbound::blob::FilesystemBlobStore;
use daybook::outbound::hashing::BcryptPasswordHasher;
use daybook::outbound::identity::OAuthHttpProvider;
use daybook::outbound::memory::{InMemoryCredentialStore, InMemorySubmissionStore};
use daybook::outbound::persistence::{DbPool, DieselCredentialStore, DieselSubmissionStore};

/// Credential and submission stores backing the services.
pub struct Stores {
    pub credentials: Arc<dyn CredentialStore>,
    pub submissions: Arc<dyn SubmissionStore>,
}

impl Stores {
    pub fn from_pool(pool: Option<DbPool>) -> Self {
        match pool {
            Some(pool) => Self {
                credentials: Arc::new(DieselCredentialStore::new(pool.clone())),
                submissions: Arc::new(DieselSubmissionStore::new(pool)),
            },
            None => Self {
                credentials: Arc::new(InMemoryCredentialStore::new()),
                submissions: Arc::new(InMemorySubmissionStore::new()),
            },
        }
    }
}

fn identity_provider(settings: &AppSettings) -> io::Result<Arc<dyn FederatedIdentityProvider>> {
    match settings.oauth_provider().map_err(io::Error::other)? {
        Some(config) => {
            info!(provider = %config.name, "federated sign-in enabled");
            let provider = OAuthHttpProvider::new(config).map_err(io::Error::other)?;
            Ok(Arc::new(provider))
        }
        None => {
            info!("federated sign-in disabled");
            Ok(Arc::new(DisabledIdentityProvider))
        }
    }
}

/// Build the HTTP state from settings and the selected stores.
///
/// # Errors
///
/// Returns an IO error for invalid settings or when the blob directory
/// cannot be opened.
pub fn build_http_state(settings: &AppSettings, stores: Stores) -> io::Result<web::Data<HttpState>> {
    let hasher = BcryptPasswordHasher::new(settings.bcrypt_cost().map_err(io::Error::other)?);
    let blobs = FilesystemBlobStore::open(settings.blob_root(), settings.public_base_url())?;

    let auth = AuthGatewayService::new(
        stores.credentials,
        Arc::new(hasher),
        identity_provider(settings)?,
        Arc::new(DefaultClock),
    );
    let submissions = SubmissionServiceImpl::new(stores.submissions);
    let attachments = AttachmentService::new(Arc::new(blobs));

    Ok(web::Data::new(HttpState::new(
        Arc::new(auth),
        Arc::new(submissions),
        Arc::new(attachments),
    )))
}
