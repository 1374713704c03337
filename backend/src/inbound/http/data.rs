//! Submission API handlers.
//!
//! ```text
//! GET  /api/data
//! POST /api/data {"label_one":"Standup","location":"location1",...}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::error::ErrorDto;
use crate::domain::{Error, ErrorCode, SubmissionDraft, SubmissionDto};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Summary returned when a listing fails.
pub const FETCH_FAILED: &str = "Error fetching data";
/// Summary returned when a create fails, whatever the cause.
pub const CREATE_FAILED: &str = "Error processing request";

/// Listing body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DaysResponse {
    #[schema(example = "Success")]
    pub message: String,
    pub days: Vec<SubmissionDto>,
}

/// Create body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SavedResponse {
    #[schema(example = "Data saved successfully")]
    pub message: String,
    /// The stored record, as a one-element list.
    pub data: Vec<SubmissionDto>,
}

/// List every submission, newest first.
#[utoipa::path(
    get,
    path = "/api/data",
    responses(
        (status = 200, description = "All submissions", body = DaysResponse),
        (status = 401, description = "Login required", body = ErrorDto),
        (status = 500, description = "Store failure", body = ErrorDto)
    ),
    tags = ["data"],
    operation_id = "listSubmissions"
)]
#[get("")]
pub async fn list_submissions(state: web::Data<HttpState>) -> ApiResult<web::Json<DaysResponse>> {
    let days = state
        .submissions
        .list()
        .await
        .map_err(|err| err.reframed(ErrorCode::InternalError, FETCH_FAILED))?;
    Ok(web::Json(DaysResponse {
        message: "Success".to_owned(),
        days: days.iter().map(SubmissionDto::from).collect(),
    }))
}

/// Validate and store one submission.
///
/// Store failures surface as `400` with the underlying message in `error`.
#[utoipa::path(
    post,
    path = "/api/data",
    request_body = SubmissionDraft,
    responses(
        (status = 201, description = "Submission stored", body = SavedResponse),
        (status = 400, description = "Invalid submission or store failure", body = ErrorDto),
        (status = 401, description = "Login required", body = ErrorDto)
    ),
    tags = ["data"],
    operation_id = "createSubmission"
)]
#[post("")]
pub async fn create_submission(
    state: web::Data<HttpState>,
    payload: web::Json<SubmissionDraft>,
) -> ApiResult<HttpResponse> {
    let stored = state
        .submissions
        .create(payload.into_inner())
        .await
        .map_err(|err| err.reframed(ErrorCode::InvalidRequest, CREATE_FAILED))?;
    info!(submission_id = %stored.id(), "submission stored");
    Ok(HttpResponse::Created().json(SavedResponse {
        message: "Data saved successfully".to_owned(),
        data: vec![SubmissionDto::from(&stored)],
    }))
}

/// Mount the submission routes under `/api/data`.
pub fn scope() -> actix_web::Scope {
    web::scope("/api/data")
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(list_submissions)
        .service(create_submission)
}

/// Map JSON body decoding failures onto the create-failure envelope.
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    Error::invalid_request(CREATE_FAILED)
        .with_diagnostic(err.to_string())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewSubmission, Submission, SubmissionId};
    use crate::inbound::http::test_utils::{MockPorts, json_body};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::json;

    fn stored(draft: SubmissionDraft) -> Submission {
        let record: NewSubmission = draft.validate().expect("valid draft");
        record.into_stored(SubmissionId::random())
    }

    fn standup() -> serde_json::Value {
        json!({
            "label_one": "Standup",
            "location": "location1",
            "start_time": "09:00",
            "end_time": "09:15",
            "dynamic_fields": [],
            "created_at": "2024-01-10T09:00:00Z",
            "ignored": true
        })
    }

    macro_rules! app {
        ($ports:expr) => {
            test::init_service(
                App::new()
                    .app_data($ports.into_state())
                    .service(scope()),
            )
            .await
        };
    }

    #[rstest]
    #[actix_web::test]
    async fn create_returns_saved_record() {
        let mut ports = MockPorts::default();
        ports
            .submissions
            .expect_create()
            .withf(|draft| draft.label_one.as_deref() == Some("Standup"))
            .times(1)
            .returning(|draft| Ok(stored(draft)));
        let app = app!(ports);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/data")
                .set_json(standup())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CREATED);
        let body = json_body(res).await;
        assert_eq!(body["message"], "Data saved successfully");
        assert_eq!(body["data"][0]["label_one"], "Standup");
        assert_eq!(body["data"][0]["created_at"], "2024-01-10T09:00:00Z");
        assert!(body["data"][0]["id"].is_string());
    }

    #[rstest]
    #[case(Error::invalid_request("label_one must not be empty"), "label_one must not be empty")]
    #[case(Error::service_unavailable("connection refused"), "connection refused")]
    #[case(Error::internal("duplicate key"), "duplicate key")]
    #[actix_web::test]
    async fn create_failures_are_bad_request_with_cause(
        #[case] failure: Error,
        #[case] cause: &str,
    ) {
        let mut ports = MockPorts::default();
        ports
            .submissions
            .expect_create()
            .returning(move |_| Err(failure.clone()));
        let app = app!(ports);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/data")
                .set_json(standup())
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = json_body(res).await;
        assert_eq!(body["message"], CREATE_FAILED);
        assert_eq!(body["error"], cause);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_json_is_bad_request() {
        let mut ports = MockPorts::default();
        ports.submissions.expect_create().never();
        let app = app!(ports);

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/data")
                .insert_header(("content-type", "application/json"))
                .set_payload("[1, 2")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["message"], CREATE_FAILED);
    }

    #[rstest]
    #[actix_web::test]
    async fn list_returns_days_in_service_order() {
        let mut ports = MockPorts::default();
        ports.submissions.expect_list().returning(|| {
            let older: SubmissionDraft = serde_json::from_value(standup()).expect("draft");
            let mut newer = older.clone();
            newer.label_one = Some("Retro".into());
            newer.created_at = Some("2024-01-11T09:00:00Z".into());
            Ok(vec![stored(newer), stored(older)])
        });
        let app = app!(ports);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/data").to_request()).await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["message"], "Success");
        assert_eq!(body["days"][0]["label_one"], "Retro");
        assert_eq!(body["days"][1]["label_one"], "Standup");
    }

    #[rstest]
    #[actix_web::test]
    async fn list_failure_is_internal_with_cause() {
        let mut ports = MockPorts::default();
        ports
            .submissions
            .expect_list()
            .returning(|| Err(Error::service_unavailable("connection refused")));
        let app = app!(ports);

        let res =
            test::call_service(&app, test::TestRequest::get().uri("/api/data").to_request()).await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(res).await;
        assert_eq!(body["message"], FETCH_FAILED);
        assert_eq!(body["error"], "connection refused");
    }
}
