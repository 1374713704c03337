//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting or retrieving the signed-in
//! user's claims.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, SessionClaims};

pub(crate) const CLAIMS_KEY: &str = "user";
pub(crate) const OAUTH_STATE_KEY: &str = "oauth_state";

/// Read the session claims, treating undecodable values as signed out.
///
/// Used by both handlers and the session guard middleware.
pub fn claims_from(session: &Session) -> Option<SessionClaims> {
    match session.get::<SessionClaims>(CLAIMS_KEY) {
        Ok(claims) => claims,
        Err(error) => {
            tracing::warn!(%error, "invalid claims in session cookie");
            None
        }
    }
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated user's claims in the session cookie.
    ///
    /// The session id is renewed to avoid fixation.
    pub fn persist_claims(&self, claims: &SessionClaims) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(CLAIMS_KEY, claims)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current claims from the session, if present.
    pub fn claims(&self) -> Option<SessionClaims> {
        claims_from(&self.0)
    }

    /// Require signed-in claims or return `401 Unauthorized`.
    pub fn require_claims(&self) -> Result<SessionClaims, Error> {
        self.claims()
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Remember the OAuth `state` issued for a federated sign-in.
    pub fn store_oauth_state(&self, state: &str) -> Result<(), Error> {
        self.0
            .insert(OAUTH_STATE_KEY, state)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Remove and return the pending OAuth `state`.
    pub fn take_oauth_state(&self) -> Option<String> {
        match self.0.remove_as::<String>(OAUTH_STATE_KEY) {
            Some(Ok(state)) => Some(state),
            Some(Err(_)) | None => None,
        }
    }

    /// Drop every session value and expire the cookie.
    pub fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new().wrap(crate::inbound::http::test_utils::test_session_middleware())
    }

    fn claims() -> SessionClaims {
        SessionClaims {
            id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
            email: "ada@example.com".into(),
            name: "Ada".into(),
        }
    }

    #[actix_web::test]
    async fn round_trips_claims() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        session.persist_claims(&claims())?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let claims = session.require_claims()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(claims.email))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        assert_eq!(set_res.status(), StatusCode::OK);
        let cookie = set_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        let body = test::read_body(get_res).await;
        assert_eq!(body, "ada@example.com");
    }

    #[actix_web::test]
    async fn missing_claims_are_unauthorised() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_claims()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/require").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn oauth_state_is_single_use() {
        let app = test::init_service(
            session_test_app()
                .route(
                    "/issue",
                    web::get().to(|session: SessionContext| async move {
                        session.store_oauth_state("abc")?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/take",
                    web::get().to(|session: SessionContext| async move {
                        let first = session.take_oauth_state();
                        let second = session.take_oauth_state();
                        HttpResponse::Ok().body(format!("{first:?}|{second:?}"))
                    }),
                ),
        )
        .await;

        let issued =
            test::call_service(&app, test::TestRequest::get().uri("/issue").to_request()).await;
        let cookie = issued
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/take").cookie(cookie).to_request(),
        )
        .await;
        let body = test::read_body(res).await;
        assert_eq!(body, "Some(\"abc\")|None");
    }

    #[actix_web::test]
    async fn tampered_cookie_reads_as_signed_out() {
        let app = test::init_service(session_test_app().route(
            "/require",
            web::get().to(|session: SessionContext| async move {
                let _ = session.require_claims()?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        ))
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(actix_web::cookie::Cookie::new("session", "not-a-valid-cookie"))
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
