//! Handler tests for the authentication endpoints.

use super::*;
use crate::domain::{DisplayName, Email, PasswordHash, User, UserId};
use crate::inbound::http::test_utils::{
    MockPorts, json_body, session_cookie, test_session_middleware,
};
use actix_web::http::StatusCode;
use actix_web::{App, test};
use chrono::Utc;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn claims() -> SessionClaims {
    SessionClaims {
        id: UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").expect("fixture id"),
        email: "ada@example.com".into(),
        name: "Ada Lovelace".into(),
    }
}

fn user() -> User {
    User::new(
        UserId::random(),
        Email::new("ada@example.com").expect("email"),
        DisplayName::new("Ada Lovelace").expect("name"),
        Some(PasswordHash::new("$2b$10$hash")),
        Utc::now(),
    )
}

macro_rules! app {
    ($ports:expr) => {
        test::init_service(
            App::new()
                .app_data($ports.into_state())
                .wrap(test_session_middleware())
                .service(scope()),
        )
        .await
    };
}

#[rstest]
#[actix_web::test]
async fn register_returns_created() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_register()
        .withf(|reg| reg.email().to_string() == "ada@example.com")
        .times(1)
        .returning(|_| Ok(user()));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "Ada Lovelace", "email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::CREATED);
    assert_eq!(json_body(res).await, json!({"message": "User created successfully"}));
}

#[rstest]
#[case(json!({"email": "ada@example.com", "password": "pw"}))]
#[case(json!({"name": "", "email": "ada@example.com", "password": "pw"}))]
#[case(json!({}))]
#[actix_web::test]
async fn register_requires_every_field(#[case] body: serde_json::Value) {
    let mut ports = MockPorts::default();
    ports.auth.expect_register().never();
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(body)
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["message"], "Missing required fields");
}

#[rstest]
#[actix_web::test]
async fn register_duplicate_is_bad_request() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_register()
        .returning(|_| Err(Error::invalid_request("User already exists")));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "Ada", "email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(res).await["message"], "User already exists");
}

#[rstest]
#[actix_web::test]
async fn register_unexpected_failure_is_internal_with_diagnostic() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_register()
        .returning(|_| Err(Error::service_unavailable("connection refused")));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "Ada", "email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(res).await;
    assert_eq!(body["message"], REGISTRATION_FAILED);
    assert_eq!(body["error"], "connection refused");
}

#[rstest]
#[actix_web::test]
async fn login_sets_session_readable_by_session_endpoint(claims: SessionClaims) {
    let mut ports = MockPorts::default();
    let issued = claims.clone();
    ports
        .auth
        .expect_authenticate()
        .withf(|creds| creds.email() == "ada@example.com" && creds.password() == "pw")
        .returning(move |_| Ok(Some(issued.clone())));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res);
    assert_eq!(json_body(res).await["user"]["email"], "ada@example.com");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/session")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = json_body(res).await;
    assert_eq!(body["user"]["id"], claims.id.to_string());
    assert_eq!(body["user"]["name"], "Ada Lovelace");
}

#[rstest]
#[actix_web::test]
async fn login_failure_is_generic_unauthorised() {
    let mut ports = MockPorts::default();
    ports.auth.expect_authenticate().returning(|_| Ok(None));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "nobody@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(res).await["message"], "invalid credentials");
}

#[rstest]
#[actix_web::test]
async fn session_without_login_is_unauthorised() {
    let app = app!(MockPorts::default());
    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/auth/session").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn sign_in_then_callback_establishes_session(claims: SessionClaims) {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_federated_sign_in_url()
        .withf(|provider, _| provider == "google")
        .returning(|_, state| Ok(format!("https://idp.example/authorize?state={state}")));
    ports
        .auth
        .expect_establish_federated_session()
        .withf(|provider, code| provider == "google" && code == "abc")
        .times(1)
        .returning(move |_, _| Ok(claims.clone()));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/signin/google")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    let location = res
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
        .expect("redirect location")
        .to_owned();
    let state = location
        .split("state=")
        .nth(1)
        .expect("state in redirect")
        .to_owned();
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/auth/callback/google?code=abc&state={state}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(
        res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some(POST_SIGN_IN_PATH)
    );
}

#[rstest]
#[actix_web::test]
async fn callback_without_issued_state_is_rejected() {
    let mut ports = MockPorts::default();
    ports.auth.expect_establish_federated_session().never();
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/auth/callback/google?code=abc&state=forged")
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}

#[rstest]
#[actix_web::test]
async fn unknown_provider_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_federated_sign_in_url()
        .returning(|provider, _| Err(Error::not_found(format!("unknown provider {provider}"))));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/auth/signin/myspace").to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn logout_clears_session(claims: SessionClaims) {
    let mut ports = MockPorts::default();
    ports
        .auth
        .expect_authenticate()
        .returning(move |_| Ok(Some(claims.clone())));
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "ada@example.com", "password": "pw"}))
            .to_request(),
    )
    .await;
    let cookie = session_cookie(&res);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/logout")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let removal = session_cookie(&res);
    assert_eq!(removal.value(), "");
}

#[rstest]
#[case("/api/auth/register")]
#[case("/api/auth/login")]
#[actix_web::test]
async fn malformed_json_gets_the_auth_envelope(#[case] uri: &str) {
    let mut ports = MockPorts::default();
    ports.auth.expect_register().never();
    ports.auth.expect_authenticate().never();
    let app = app!(ports);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"email\": ")
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body = json_body(res).await;
    assert_eq!(body["message"], MALFORMED_BODY);
    assert_ne!(body["message"], "Error processing request");
    assert!(body["error"].is_string());
}
