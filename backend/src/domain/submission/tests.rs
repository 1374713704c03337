//! Tests for submission validation and wire mapping.

use super::*;
use rstest::{fixture, rstest};
use serde_json::json;

#[fixture]
fn standup() -> SubmissionDraft {
    serde_json::from_value(json!({
        "label_one": "Standup",
        "location": "location1",
        "start_time": "09:00",
        "end_time": "09:15",
        "dynamic_fields": [],
        "created_at": "2024-01-10T09:00:00Z"
    }))
    .expect("valid draft json")
}

#[rstest]
fn validates_minimal_standup(standup: SubmissionDraft) {
    let record = standup.validate().expect("valid draft");
    assert_eq!(record.primary_label, "Standup");
    assert_eq!(record.location, "location1");
    assert_eq!(record.primary_start.as_str(), "09:00");
    assert_eq!(record.primary_end.as_str(), "09:15");
    assert!(record.secondary_entries.is_empty());
    assert_eq!(record.attachment, Attachment::default());
    assert_eq!(record.created_at.to_rfc3339(), "2024-01-10T09:00:00+00:00");
}

#[rstest]
fn unknown_keys_are_ignored() {
    let draft: SubmissionDraft = serde_json::from_value(json!({
        "label_one": "Standup",
        "mood": "sleepy"
    }))
    .expect("unknown keys tolerated");
    assert_eq!(draft.label_one.as_deref(), Some("Standup"));
}

#[rstest]
#[case("label_one")]
#[case("location")]
fn blank_required_strings_are_rejected(mut standup: SubmissionDraft, #[case] field: &str) {
    match field {
        "label_one" => standup.label_one = Some("   ".into()),
        _ => standup.location = None,
    }
    let err = standup.validate().expect_err("blank field");
    assert!(matches!(err, SubmissionValidationError::MissingField { .. }));
    assert!(err.to_string().starts_with(field));
}

#[rstest]
#[case("9am")]
#[case("25:00")]
#[case("")]
fn malformed_times_are_rejected(mut standup: SubmissionDraft, #[case] value: &str) {
    standup.start_time = Some(value.into());
    let err = standup.validate().expect_err("bad time");
    assert!(matches!(
        err,
        SubmissionValidationError::InvalidTime { ref field, .. } if field == "start_time"
    ));
}

#[rstest]
fn seconds_precision_times_are_accepted(mut standup: SubmissionDraft) {
    standup.end_time = Some("09:15:30".into());
    let record = standup.validate().expect("valid");
    assert_eq!(record.primary_end.as_str(), "09:15:30");
}

#[rstest]
fn end_before_start_is_accepted(mut standup: SubmissionDraft) {
    standup.start_time = Some("17:00".into());
    standup.end_time = Some("08:00".into());
    assert!(standup.validate().is_ok());
}

#[rstest]
#[case(None)]
#[case(Some("10/01/2024"))]
fn created_at_must_be_rfc3339(mut standup: SubmissionDraft, #[case] value: Option<&str>) {
    standup.created_at = value.map(str::to_owned);
    assert!(standup.validate().is_err());
}

#[rstest]
fn created_at_offsets_normalise_to_utc(mut standup: SubmissionDraft) {
    standup.created_at = Some("2024-01-10T10:00:00+01:00".into());
    let record = standup.validate().expect("valid");
    assert_eq!(record.created_at.to_rfc3339(), "2024-01-10T09:00:00+00:00");
}

#[rstest]
fn custom_location_stores_free_text(mut standup: SubmissionDraft) {
    standup.location = Some(CUSTOM_LOCATION_SENTINEL.into());
    standup.custom_location = Some("Kitchen table".into());
    let record = standup.validate().expect("valid");
    assert_eq!(record.location, "Kitchen table");
}

#[rstest]
fn custom_location_requires_text(mut standup: SubmissionDraft) {
    standup.location = Some(CUSTOM_LOCATION_SENTINEL.into());
    assert_eq!(
        standup.validate().expect_err("missing text"),
        SubmissionValidationError::MissingCustomLocation
    );
}

#[rstest]
fn secondary_entries_keep_order_and_default_labels(mut standup: SubmissionDraft) {
    standup.dynamic_fields = Some(vec![
        SecondaryEntryDraft {
            label: Some("A".into()),
            value: Some("first".into()),
            start_time: Some("10:00".into()),
            end_time: Some("10:30".into()),
        },
        SecondaryEntryDraft {
            label: None,
            value: None,
            start_time: Some("11:00".into()),
            end_time: Some("11:30".into()),
        },
        SecondaryEntryDraft {
            label: Some(" ".into()),
            value: Some("third".into()),
            start_time: Some("12:00".into()),
            end_time: Some("12:30".into()),
        },
    ]);
    let record = standup.validate().expect("valid");
    let labels: Vec<_> = record
        .secondary_entries
        .iter()
        .map(|e| e.label.as_str())
        .collect();
    assert_eq!(
        labels,
        ["A", SECONDARY_LABEL_PLACEHOLDER, SECONDARY_LABEL_PLACEHOLDER]
    );
    assert_eq!(record.secondary_entries[1].value, "");
}

#[rstest]
fn secondary_entry_times_are_validated(mut standup: SubmissionDraft) {
    standup.dynamic_fields = Some(vec![SecondaryEntryDraft {
        start_time: Some("10:00".into()),
        end_time: Some("later".into()),
        ..SecondaryEntryDraft::default()
    }]);
    let err = standup.validate().expect_err("bad secondary time");
    assert!(err.to_string().contains("dynamic_fields[0].end_time"));
}

#[rstest]
fn empty_attachment_strings_become_absent(mut standup: SubmissionDraft) {
    standup.file_name = Some(String::new());
    standup.file_url = Some(String::new());
    let record = standup.validate().expect("valid");
    assert_eq!(record.attachment, Attachment::default());
}

#[rstest]
fn mismatched_attachment_is_accepted(mut standup: SubmissionDraft) {
    standup.file_url = Some("http://localhost/blobs/submissions/1.pdf".into());
    let record = standup.validate().expect("valid");
    assert!(record.attachment.is_mismatched());
}

#[rstest]
fn dto_uses_wire_keys(standup: SubmissionDraft) {
    let id = SubmissionId::from_uuid(Uuid::nil());
    let submission = standup.validate().expect("valid").into_stored(id);
    let value = serde_json::to_value(SubmissionDto::from(&submission)).expect("serialise");
    assert_eq!(
        value,
        json!({
            "id": "00000000-0000-0000-0000-000000000000",
            "label_one": "Standup",
            "location": "location1",
            "start_time": "09:00",
            "end_time": "09:15",
            "file_name": null,
            "file_url": null,
            "dynamic_fields": [],
            "created_at": "2024-01-10T09:00:00Z"
        })
    );
}
