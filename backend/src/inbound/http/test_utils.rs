//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{test, web};
use serde_json::Value;

use super::session_config::{SESSION_COOKIE_NAME, SessionSettings, session_middleware};
use super::state::HttpState;
use crate::domain::ports::{MockAttachmentUploader, MockAuthGateway, MockSubmissionService};

/// Session middleware with a fresh key and an insecure cookie for local HTTP
/// tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    session_middleware(&SessionSettings::ephemeral())
}

/// Handler state built from port mocks; unset mocks panic when called.
pub struct MockPorts {
    pub auth: MockAuthGateway,
    pub submissions: MockSubmissionService,
    pub attachments: MockAttachmentUploader,
}

impl Default for MockPorts {
    fn default() -> Self {
        Self {
            auth: MockAuthGateway::new(),
            submissions: MockSubmissionService::new(),
            attachments: MockAttachmentUploader::new(),
        }
    }
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            Arc::new(self.auth),
            Arc::new(self.submissions),
            Arc::new(self.attachments),
        ))
    }
}

/// Read a JSON response body.
pub async fn json_body(response: ServiceResponse) -> Value {
    let bytes = test::read_body(response).await;
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Session cookie set by a response.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .expect("session cookie set")
        .into_owned()
}
