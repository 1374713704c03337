//! Creating and listing days through `/api/data` and the days page.

#[macro_use]
mod support;

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use rstest::rstest;
use serde_json::{Value, json};

use support::{FailingSubmissionStore, Harness};

fn day(label: &str, created_at: &str) -> Value {
    json!({
        "label_one": label,
        "location": "location1",
        "start_time": "09:00",
        "end_time": "09:15",
        "created_at": created_at,
    })
}

#[rstest]
#[actix_web::test]
async fn created_days_are_echoed_and_listed_newest_first() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let entries = [
        ("Oldest", "2024-01-08T09:00:00Z"),
        ("Tie first", "2024-01-09T09:00:00Z"),
        ("Newest", "2024-01-10T09:00:00Z"),
        ("Tie second", "2024-01-09T09:00:00Z"),
    ];
    for (label, created_at) in entries {
        let created = call!(
            app,
            TestRequest::post()
                .uri("/api/data")
                .cookie(cookie.clone())
                .set_json(day(label, created_at))
        );
        assert_eq!(created.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(created).await;
        assert_eq!(body["message"], "Data saved successfully");
        assert_eq!(body["data"][0]["label_one"], label);
        assert_eq!(body["data"].as_array().map(Vec::len), Some(1));
    }

    let listed = call!(app, TestRequest::get().uri("/api/data").cookie(cookie));
    assert_eq!(listed.status(), StatusCode::OK);
    let body: Value = test::read_body_json(listed).await;
    assert_eq!(body["message"], "Success");
    let labels: Vec<&str> = body["days"]
        .as_array()
        .expect("days array")
        .iter()
        .filter_map(|day| day["label_one"].as_str())
        .collect();
    assert_eq!(labels, ["Newest", "Tie first", "Tie second", "Oldest"]);
}

#[rstest]
#[actix_web::test]
async fn secondary_entries_keep_their_order_and_placeholder_labels() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let mut payload = day("Standup", "2024-01-10T09:00:00Z");
    payload["dynamic_fields"] = json!([
        { "label": "Review", "value": "PR 42", "start_time": "10:00", "end_time": "10:30" },
        { "label": "", "value": "", "start_time": "11:00", "end_time": "11:15" },
        { "label": "Lunch", "value": "", "start_time": "12:00", "end_time": "13:00" },
    ]);
    payload["file_name"] = json!("notes.pdf");
    payload["file_url"] = json!("http://localhost:8080/blobs/submissions/1.pdf");

    let created = call!(
        app,
        TestRequest::post()
            .uri("/api/data")
            .cookie(cookie.clone())
            .set_json(payload)
    );
    assert_eq!(created.status(), StatusCode::CREATED);

    let listed = call!(app, TestRequest::get().uri("/api/data").cookie(cookie));
    let body: Value = test::read_body_json(listed).await;
    let stored = &body["days"][0];
    let labels: Vec<&str> = stored["dynamic_fields"]
        .as_array()
        .expect("dynamic fields")
        .iter()
        .filter_map(|entry| entry["label"].as_str())
        .collect();
    assert_eq!(labels, ["Review", "Field Label One", "Lunch"]);
    assert_eq!(stored["file_name"], "notes.pdf");
    assert_eq!(stored["created_at"], "2024-01-10T09:00:00Z");
}

#[rstest]
#[actix_web::test]
async fn custom_locations_store_the_free_text() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let mut payload = day("Site visit", "2024-01-10T09:00:00Z");
    payload["location"] = json!("custom");
    payload["custom_location"] = json!("Client HQ");

    let created = call!(
        app,
        TestRequest::post().uri("/api/data").cookie(cookie).set_json(payload)
    );
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["data"][0]["location"], "Client HQ");
}

#[rstest]
#[case::missing_label(json!({ "location": "location1", "start_time": "09:00", "end_time": "10:00", "created_at": "2024-01-10T09:00:00Z" }))]
#[case::bad_time(json!({ "label_one": "Standup", "location": "location1", "start_time": "9am", "end_time": "10:00", "created_at": "2024-01-10T09:00:00Z" }))]
#[case::missing_created_at(json!({ "label_one": "Standup", "location": "location1", "start_time": "09:00", "end_time": "10:00" }))]
#[case::custom_without_text(json!({ "label_one": "Standup", "location": "custom", "start_time": "09:00", "end_time": "10:00", "created_at": "2024-01-10T09:00:00Z" }))]
#[case::not_an_object(json!(["Standup"]))]
#[actix_web::test]
async fn invalid_days_are_rejected_with_a_diagnostic(#[case] payload: Value) {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let response = call!(
        app,
        TestRequest::post()
            .uri("/api/data")
            .cookie(cookie.clone())
            .set_json(payload)
    );
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body["message"], "Error processing request");
    assert!(body["error"].is_string());

    let listed = call!(app, TestRequest::get().uri("/api/data").cookie(cookie));
    let body: Value = test::read_body_json(listed).await;
    assert_eq!(body["days"], json!([]));
}

#[rstest]
#[actix_web::test]
async fn store_failures_surface_the_underlying_error() {
    let harness = Harness::with_submission_store(Arc::new(FailingSubmissionStore {
        message: "relation \"form_submissions\" does not exist",
    }));
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let listed = call!(
        app,
        TestRequest::get().uri("/api/data").cookie(cookie.clone())
    );
    assert_eq!(listed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(listed).await;
    assert_eq!(body["message"], "Error fetching data");
    assert_eq!(body["error"], "relation \"form_submissions\" does not exist");

    let created = call!(
        app,
        TestRequest::post()
            .uri("/api/data")
            .cookie(cookie.clone())
            .set_json(day("Standup", "2024-01-10T09:00:00Z"))
    );
    assert_eq!(created.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(created).await;
    assert_eq!(body["message"], "Error processing request");

    let health = call!(app, TestRequest::get().uri("/api/health").cookie(cookie));
    assert_eq!(health.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(health).await;
    assert_eq!(body["status"], "error");
}

#[rstest]
#[actix_web::test]
async fn days_page_renders_cards_with_location_labels() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;
    let cookie = signed_in!(app, "ada@example.com");

    let created = call!(
        app,
        TestRequest::post()
            .uri("/api/data")
            .cookie(cookie.clone())
            .set_json(day("Standup", "2024-01-10T09:00:00Z"))
    );
    assert_eq!(created.status(), StatusCode::CREATED);

    let page = call!(app, TestRequest::get().uri("/days").cookie(cookie));
    assert_eq!(page.status(), StatusCode::OK);
    let html = String::from_utf8(test::read_body(page).await.to_vec()).expect("utf-8 page");
    assert!(html.contains("Standup"));
    assert!(html.contains("Office Building A"));
    assert!(html.contains("10 January"));
}
