//! Authentication API handlers.
//!
//! ```text
//! POST /api/auth/register {"name":"Ada","email":"ada@example.com","password":"pw"}
//! POST /api/auth/login    {"email":"ada@example.com","password":"pw"}
//! POST /api/auth/logout
//! GET  /api/auth/session
//! GET  /api/auth/signin/{provider}
//! GET  /api/auth/callback/{provider}?code=...&state=...
//! ```

use actix_web::{HttpResponse, get, http::header, post, web};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;

use crate::domain::error::ErrorDto;
use crate::domain::{
    CredentialsValidationError, Error, ErrorCode, LoginCredentials, Registration, SessionClaims,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Where a completed federated sign-in lands.
pub const POST_SIGN_IN_PATH: &str = "/home";

const REGISTRATION_FAILED: &str = "An error occurred during registration";
const MALFORMED_BODY: &str = "Malformed request body";

/// Registration body. Fields are optional so absent and empty values both
/// report "Missing required fields".
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    #[serde(default)]
    #[schema(example = "Ada Lovelace")]
    pub name: Option<String>,
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Login body.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "ada@example.com")]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Confirmation message body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "User created successfully")]
    pub message: String,
}

/// Signed-in user body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub user: SessionClaims,
}

/// Query string of the provider callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
}

fn map_credentials_error(err: CredentialsValidationError) -> Error {
    match err {
        CredentialsValidationError::MissingFields => Error::invalid_request(err.to_string()),
        CredentialsValidationError::EmptyEmail => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "email", "code": "empty_email" })),
        CredentialsValidationError::EmptyPassword => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "password", "code": "empty_password" })),
        CredentialsValidationError::Invalid(inner) => Error::invalid_request(inner.to_string()),
    }
}

/// Create a local account.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "User created", body = MessageResponse),
        (status = 400, description = "Missing fields or user already exists", body = ErrorDto),
        (status = 500, description = "Registration failed", body = ErrorDto)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let RegisterRequest {
        name,
        email,
        password,
    } = payload.into_inner();
    let registration =
        Registration::try_from_parts(name.as_deref(), email.as_deref(), password.as_deref())
            .map_err(map_credentials_error)?;

    let user = state.auth.register(registration).await.map_err(|err| {
        if err.code() == ErrorCode::InvalidRequest {
            err
        } else {
            err.reframed(ErrorCode::InternalError, REGISTRATION_FAILED)
        }
    })?;
    info!(user_id = %user.id(), "user registered");

    Ok(HttpResponse::Created().json(MessageResponse {
        message: "User created successfully".to_owned(),
    }))
}

/// Check email and password and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorDto),
        (status = 401, description = "Invalid credentials", body = ErrorDto)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from_parts(&payload.email, &payload.password)
        .map_err(map_credentials_error)?;
    let claims = state
        .auth
        .authenticate(&credentials)
        .await?
        .ok_or_else(|| Error::unauthorized("invalid credentials"))?;
    session.persist_claims(&claims)?;
    Ok(HttpResponse::Ok().json(SessionResponse { user: claims }))
}

/// End the current session.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// Return the signed-in user.
#[utoipa::path(
    get,
    path = "/api/auth/session",
    responses(
        (status = 200, description = "Signed in", body = SessionResponse),
        (status = 401, description = "Not signed in", body = ErrorDto)
    ),
    tags = ["auth"],
    operation_id = "currentSession",
    security([])
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<SessionResponse>> {
    let user = session.require_claims()?;
    Ok(web::Json(SessionResponse { user }))
}

fn random_state() -> String {
    let mut bytes = [0_u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Start federated sign-in with `provider`.
#[utoipa::path(
    get,
    path = "/api/auth/signin/{provider}",
    params(("provider" = String, Path, description = "Identity provider name")),
    responses(
        (status = 302, description = "Redirect to the provider"),
        (status = 404, description = "Unknown provider", body = ErrorDto)
    ),
    tags = ["auth"],
    operation_id = "federatedSignIn",
    security([])
)]
#[get("/signin/{provider}")]
pub async fn sign_in(
    state: web::Data<HttpState>,
    session: SessionContext,
    provider: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let oauth_state = random_state();
    let url = state.auth.federated_sign_in_url(&provider, &oauth_state)?;
    session.store_oauth_state(&oauth_state)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, url))
        .finish())
}

/// Complete federated sign-in and redirect to the home page.
#[utoipa::path(
    get,
    path = "/api/auth/callback/{provider}",
    params(
        ("provider" = String, Path, description = "Identity provider name"),
        ("code" = String, Query, description = "Authorisation code"),
        ("state" = String, Query, description = "State issued at sign-in")
    ),
    responses(
        (status = 302, description = "Signed in; redirect to /home"),
        (status = 401, description = "Provider rejected the sign-in", body = ErrorDto),
        (status = 404, description = "Unknown provider", body = ErrorDto)
    ),
    tags = ["auth"],
    operation_id = "federatedCallback",
    security([])
)]
#[get("/callback/{provider}")]
pub async fn callback(
    state: web::Data<HttpState>,
    session: SessionContext,
    provider: web::Path<String>,
    query: web::Query<CallbackQuery>,
) -> ApiResult<HttpResponse> {
    let CallbackQuery { code, state: echoed } = query.into_inner();
    let expected = session.take_oauth_state();
    if expected.is_none() || expected != echoed {
        warn!(provider = %provider, "federated callback with unexpected state");
        return Err(Error::unauthorized("sign-in state mismatch"));
    }
    let code = code
        .filter(|code| !code.is_empty())
        .ok_or_else(|| Error::unauthorized("missing authorisation code"))?;

    let claims = state
        .auth
        .establish_federated_session(&provider, &code)
        .await?;
    session.persist_claims(&claims)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, POST_SIGN_IN_PATH))
        .finish())
}

/// Mount the authentication routes under `/api/auth`.
pub fn scope() -> actix_web::Scope {
    web::scope("/api/auth")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(register)
        .service(login)
        .service(logout)
        .service(current_session)
        .service(sign_in)
        .service(callback)
}

fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(MALFORMED_BODY)
        .with_diagnostic(err.to_string())
        .into()
}

#[cfg(test)]
mod tests;
