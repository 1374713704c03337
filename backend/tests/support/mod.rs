//! Shared harness for the HTTP integration tests.
//!
//! Builds the full Actix app (routes, session guard, cookie sessions and
//! trace middleware) over in-memory stores, a temporary blob directory and a
//! scripted identity provider.
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::cookie::Cookie;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};
use async_trait::async_trait;
use mockable::DefaultClock;
use tempfile::TempDir;

use daybook::Trace;
use daybook::domain::ports::{
    FederatedIdentity, FederatedIdentityProvider, IdentityProviderError, SubmissionStore,
    SubmissionStoreError,
};
use daybook::domain::{
    AttachmentService, AuthGatewayService, DisplayName, Email, NewSubmission, Submission,
    SubmissionServiceImpl,
};
use daybook::inbound::http::configure;
use daybook::inbound::http::health::HealthState;
use daybook::inbound::http::session_config::{
    SESSION_COOKIE_NAME, SessionSettings, session_middleware,
};
use daybook::inbound::http::state::HttpState;
use daybook::middleware::SessionGuard;
use daybook::outbound::blob::FilesystemBlobStore;
use daybook::outbound::hashing::BcryptPasswordHasher;
use daybook::outbound::memory::{InMemoryCredentialStore, InMemorySubmissionStore};

pub const BASE_URL: &str = "http://localhost:8080";
pub const PROVIDER: &str = "oauth";
pub const VALID_CODE: &str = "valid-code";
pub const FEDERATED_EMAIL: &str = "grace@example.com";

/// Identity provider answering `VALID_CODE` with a fixed identity.
pub struct ScriptedIdentityProvider;

#[async_trait]
impl FederatedIdentityProvider for ScriptedIdentityProvider {
    fn authorization_url(&self, provider: &str, state: &str) -> Result<String, IdentityProviderError> {
        if provider != PROVIDER {
            return Err(IdentityProviderError::unknown_provider(provider));
        }
        Ok(format!("https://idp.test/authorize?state={state}"))
    }

    async fn exchange_code(
        &self,
        provider: &str,
        code: &str,
    ) -> Result<FederatedIdentity, IdentityProviderError> {
        if provider != PROVIDER {
            return Err(IdentityProviderError::unknown_provider(provider));
        }
        if code != VALID_CODE {
            return Err(IdentityProviderError::rejected(400_u16, "invalid_grant"));
        }
        Ok(FederatedIdentity {
            email: Email::new(FEDERATED_EMAIL).expect("valid email"),
            display_name: DisplayName::new("Grace Hopper").expect("valid name"),
        })
    }
}

/// Submission store whose every call fails with a query error.
pub struct FailingSubmissionStore {
    pub message: &'static str,
}

#[async_trait]
impl SubmissionStore for FailingSubmissionStore {
    async fn append(&self, _record: &NewSubmission) -> Result<Submission, SubmissionStoreError> {
        Err(SubmissionStoreError::query(self.message))
    }

    async fn list_newest_first(&self) -> Result<Vec<Submission>, SubmissionStoreError> {
        Err(SubmissionStoreError::query(self.message))
    }

    async fn ping(&self) -> Result<(), SubmissionStoreError> {
        Err(SubmissionStoreError::connection(self.message))
    }
}

/// Application state plus the temporary directory it writes blobs into.
pub struct Harness {
    _blob_dir: TempDir,
    pub state: web::Data<HttpState>,
    pub session: SessionSettings,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_submission_store(Arc::new(InMemorySubmissionStore::new()))
    }

    pub fn with_submission_store(store: Arc<dyn SubmissionStore>) -> Self {
        let blob_dir = TempDir::new().expect("temp dir");
        let blobs = FilesystemBlobStore::open(blob_dir.path(), BASE_URL).expect("blob store");
        let auth = AuthGatewayService::new(
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(BcryptPasswordHasher::new(4)),
            Arc::new(ScriptedIdentityProvider),
            Arc::new(DefaultClock),
        );
        let state = HttpState::new(
            Arc::new(auth),
            Arc::new(SubmissionServiceImpl::new(store)),
            Arc::new(AttachmentService::new(Arc::new(blobs))),
        );
        Self {
            _blob_dir: blob_dir,
            state: web::Data::new(state),
            session: SessionSettings::ephemeral(),
        }
    }

    /// The application as the server assembles it.
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        App::new()
            .app_data(health)
            .app_data(self.state.clone())
            .configure(configure)
            .wrap(SessionGuard::default())
            .wrap(session_middleware(&self.session))
            .wrap(Trace)
    }
}

/// Session cookie set by `response`, if any.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

/// Issue a request against an initialised app.
macro_rules! call {
    ($app:expr, $request:expr) => {
        actix_web::test::call_service(&$app, $request.to_request()).await
    };
}

/// Register `email` with password `"s3cret-pass"`, log in and return the
/// session cookie.
macro_rules! signed_in {
    ($app:expr, $email:expr) => {{
        let registered = call!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/auth/register")
                .set_json(serde_json::json!({
                    "name": "Ada Lovelace",
                    "email": $email,
                    "password": "s3cret-pass",
                }))
        );
        assert_eq!(registered.status(), actix_web::http::StatusCode::CREATED);
        let login = call!(
            $app,
            actix_web::test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(serde_json::json!({ "email": $email, "password": "s3cret-pass" }))
        );
        assert_eq!(login.status(), actix_web::http::StatusCode::OK);
        support::session_cookie(&login).expect("login sets a session cookie")
    }};
}
