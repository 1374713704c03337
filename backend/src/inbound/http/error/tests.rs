//! Tests for HTTP error mapping.

use super::*;
use crate::domain::Error;
use actix_web::ResponseError;
use actix_web::body::to_bytes;
use actix_web::http::StatusCode;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn expected_trace_id() -> String {
    TRACE_ID.to_owned()
}

#[fixture]
fn internal_error_case(expected_trace_id: String) -> Error {
    Error::internal("boom")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"secret": "x"}))
}

#[fixture]
fn invalid_request_case(expected_trace_id: String) -> Error {
    Error::invalid_request("bad")
        .with_trace_id(expected_trace_id)
        .with_details(json!({"field": "name"}))
}

#[rstest]
#[case(Error::invalid_request("bad"), StatusCode::BAD_REQUEST)]
#[case(Error::unauthorized("no auth"), StatusCode::UNAUTHORIZED)]
#[case(Error::forbidden("denied"), StatusCode::FORBIDDEN)]
#[case(Error::not_found("missing"), StatusCode::NOT_FOUND)]
#[case(Error::conflict("taken"), StatusCode::CONFLICT)]
#[case(Error::service_unavailable("down"), StatusCode::SERVICE_UNAVAILABLE)]
#[case(Error::internal("boom"), StatusCode::INTERNAL_SERVER_ERROR)]
fn status_code_matches_error_code(#[case] err: Error, #[case] status: StatusCode) {
    assert_eq!(ResponseError::status_code(&err), status);
}

async fn response_body(error: Error, expected_status: StatusCode) -> (Option<String>, Value) {
    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), expected_status);
    let header = response
        .headers()
        .get(TRACE_ID_HEADER)
        .map(|value| value.to_str().expect("trace-id is ASCII").to_owned());
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let body = serde_json::from_slice(&bytes).expect("error JSON");
    (header, body)
}

#[rstest]
#[actix_web::test]
async fn internal_errors_without_diagnostic_are_redacted(
    internal_error_case: Error,
    expected_trace_id: String,
) {
    let (header, body) =
        response_body(internal_error_case, StatusCode::INTERNAL_SERVER_ERROR).await;

    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Internal server error",
            "traceId": expected_trace_id,
        })
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_with_diagnostic_keep_summary_but_drop_details() {
    let error = Error::internal("Error fetching data")
        .with_diagnostic("relation does not exist")
        .with_details(json!({"sql": "select"}));

    let (header, body) = response_body(error, StatusCode::INTERNAL_SERVER_ERROR).await;

    assert!(header.is_none());
    assert_eq!(
        body,
        json!({
            "code": "internal_error",
            "message": "Error fetching data",
            "error": "relation does not exist",
        })
    );
}

#[rstest]
#[actix_web::test]
async fn client_errors_pass_through(invalid_request_case: Error, expected_trace_id: String) {
    let (header, body) = response_body(invalid_request_case, StatusCode::BAD_REQUEST).await;

    assert_eq!(header.as_deref(), Some(expected_trace_id.as_str()));
    assert_eq!(body["message"], "bad");
    assert_eq!(body["details"], json!({"field": "name"}));
}

#[rstest]
fn actix_errors_become_opaque_internal_errors() {
    let actix_error = actix_web::error::ErrorBadGateway("upstream secret");
    let error = Error::from(actix_error);
    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), INTERNAL_ERROR_MESSAGE);
    assert!(error.diagnostic().is_none());
}
