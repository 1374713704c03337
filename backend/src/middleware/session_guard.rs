//! Session guard middleware.
//!
//! Requests to protected paths need session claims. Unauthenticated page
//! requests are redirected to the login page with a `callbackUrl`; API
//! requests get a `401` JSON error. Public prefixes always win over protected
//! ones.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_session::SessionExt;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header;
use actix_web::{Error, HttpResponse, ResponseError};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain::Error as DomainError;
use crate::inbound::http::session::claims_from;

/// Query parameter carrying the originally requested path.
pub const CALLBACK_PARAM: &str = "callbackUrl";

/// How a request path is treated by the guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// No session needed.
    Open,
    /// Session needed; unauthenticated callers are redirected.
    ProtectedPage,
    /// Session needed; unauthenticated callers get `401`.
    ProtectedApi,
}

/// Path rules applied by [`SessionGuard`].
///
/// A prefix matches the exact path or the path followed by `/`, so `/home`
/// covers `/home/settings` but not `/homework`.
///
/// # Examples
/// ```
/// use daybook::middleware::session_guard::{Access, ProtectedRoutes};
///
/// let routes = ProtectedRoutes::default();
/// assert_eq!(routes.access("/home"), Access::ProtectedPage);
/// assert_eq!(routes.access("/api/data"), Access::ProtectedApi);
/// assert_eq!(routes.access("/api/auth/login"), Access::Open);
/// assert_eq!(routes.access("/homework"), Access::Open);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedRoutes {
    protected_prefixes: Vec<String>,
    public_prefixes: Vec<String>,
    api_prefix: String,
    login_path: String,
}

impl Default for ProtectedRoutes {
    fn default() -> Self {
        Self::new(
            ["/home", "/account", "/days", "/api"],
            ["/api/auth", "/login"],
            "/api",
            "/login",
        )
    }
}

fn normalise(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_owned()
    } else if trimmed.starts_with('/') {
        trimmed.to_owned()
    } else {
        format!("/{trimmed}")
    }
}

fn matches_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

impl ProtectedRoutes {
    pub fn new<P, Q>(protected: P, public: Q, api_prefix: &str, login_path: &str) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        Self {
            protected_prefixes: protected.into_iter().map(|p| normalise(p.as_ref())).collect(),
            public_prefixes: public.into_iter().map(|p| normalise(p.as_ref())).collect(),
            api_prefix: normalise(api_prefix),
            login_path: normalise(login_path),
        }
    }

    /// Replace the protected prefixes, keeping the other rules.
    #[must_use]
    pub fn with_protected<P>(mut self, protected: P) -> Self
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
    {
        self.protected_prefixes = protected.into_iter().map(|p| normalise(p.as_ref())).collect();
        self
    }

    /// Replace the public prefixes, keeping the other rules.
    #[must_use]
    pub fn with_public<Q>(mut self, public: Q) -> Self
    where
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        self.public_prefixes = public.into_iter().map(|p| normalise(p.as_ref())).collect();
        self
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    /// Classify a request path.
    pub fn access(&self, path: &str) -> Access {
        if self.public_prefixes.iter().any(|p| matches_prefix(path, p)) {
            return Access::Open;
        }
        if !self.protected_prefixes.iter().any(|p| matches_prefix(path, p)) {
            return Access::Open;
        }
        if matches_prefix(path, &self.api_prefix) {
            Access::ProtectedApi
        } else {
            Access::ProtectedPage
        }
    }

    /// Login URL that returns to `original` (path plus query) after sign-in.
    pub fn login_redirect(&self, original: &str) -> String {
        let encoded: String = url::form_urlencoded::byte_serialize(original.as_bytes()).collect();
        format!("{}?{CALLBACK_PARAM}={encoded}", self.login_path)
    }
}

/// Middleware enforcing [`ProtectedRoutes`].
///
/// Must be wrapped inside the session middleware so the session is readable.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use daybook::middleware::SessionGuard;
///
/// let app = App::new().wrap(SessionGuard::default());
/// ```
#[derive(Clone, Default)]
pub struct SessionGuard {
    routes: Rc<ProtectedRoutes>,
}

impl SessionGuard {
    pub fn new(routes: ProtectedRoutes) -> Self {
        Self {
            routes: Rc::new(routes),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware {
            service,
            routes: Rc::clone(&self.routes),
        }))
    }
}

/// Service wrapper produced by [`SessionGuard`].
pub struct SessionGuardMiddleware<S> {
    service: S,
    routes: Rc<ProtectedRoutes>,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let access = self.routes.access(req.path());
        let signed_in = access == Access::Open || claims_from(&req.get_session()).is_some();
        if signed_in {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        }

        let original = req
            .uri()
            .path_and_query()
            .map_or_else(|| req.path().to_owned(), |pq| pq.as_str().to_owned());
        let redirect = self.routes.login_redirect(&original);
        Box::pin(async move {
            debug!(path = %req.path(), ?access, "rejecting unauthenticated request");
            // Built here so the error picks up the request trace id.
            let response = match access {
                Access::ProtectedApi => DomainError::unauthorized("login required").error_response(),
                _ => HttpResponse::Found()
                    .insert_header((header::LOCATION, redirect))
                    .finish(),
            };
            Ok(req.into_response(response).map_into_right_body())
        })
    }
}
