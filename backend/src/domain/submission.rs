//! Submission ("day") data model.
//!
//! A submission records one primary labelled time block, any number of
//! secondary blocks, an optional attachment and a location. Records are
//! append-only: created once, never updated.
//!
//! Incoming JSON is decoded into a permissive [`SubmissionDraft`] and then
//! validated into a [`NewSubmission`]. The store assigns the id and returns a
//! [`Submission`]. Both draft and stored record use the snake_case wire keys
//! the browser form posts (`label_one`, `dynamic_fields`, ...).

use std::fmt;

use chrono::{DateTime, NaiveTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;
use uuid::Uuid;

/// Label given to secondary entries submitted without one.
pub const SECONDARY_LABEL_PLACEHOLDER: &str = "Field Label One";

/// Location value that switches the form to a free-text location.
pub const CUSTOM_LOCATION_SENTINEL: &str = "custom";

/// Validation failures raised while turning a draft into a submission.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionValidationError {
    #[error("{field} must not be empty")]
    MissingField { field: &'static str },
    #[error("{field} must be a time of day (HH:MM or HH:MM:SS), got '{value}'")]
    InvalidTime { field: String, value: String },
    #[error("created_at must be an RFC 3339 timestamp, got '{value}'")]
    InvalidTimestamp { value: String },
    #[error("custom_location must not be empty when location is 'custom'")]
    MissingCustomLocation,
}

/// Store-assigned submission identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct SubmissionId(Uuid);

impl SubmissionId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Time-of-day value kept in the caller's textual form.
///
/// Accepts `HH:MM` and `HH:MM:SS`; the original spelling is preserved so the
/// record reads back exactly as submitted.
///
/// # Examples
/// ```
/// use daybook::domain::TimeOfDay;
///
/// assert_eq!(TimeOfDay::parse("start_time", "09:15").unwrap().as_str(), "09:15");
/// assert!(TimeOfDay::parse("start_time", "9am").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, example = "09:00")]
pub struct TimeOfDay(String);

impl TimeOfDay {
    /// Validate a time-of-day string on behalf of `field`.
    pub fn parse(field: &str, value: &str) -> Result<Self, SubmissionValidationError> {
        let trimmed = value.trim();
        let valid = NaiveTime::parse_from_str(trimmed, "%H:%M").is_ok()
            || NaiveTime::parse_from_str(trimmed, "%H:%M:%S").is_ok();
        if valid {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(SubmissionValidationError::InvalidTime {
                field: field.to_owned(),
                value: value.to_owned(),
            })
        }
    }

    /// Wrap a value read back from storage without re-validating it.
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One additional labelled time block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SecondaryEntry {
    #[schema(example = "Field Label One")]
    pub label: String,
    /// Free text; may be empty.
    #[schema(example = "Planning")]
    pub value: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
}

/// Optional file attached to a submission.
///
/// Name and URL normally travel together; a record carrying only one of them
/// is accepted as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attachment {
    pub name: Option<String>,
    pub url: Option<String>,
}

impl Attachment {
    /// Normalise raw attachment fields: empty strings become absent.
    pub fn from_parts(name: Option<String>, url: Option<String>) -> Self {
        let non_empty = |value: Option<String>| value.filter(|v| !v.trim().is_empty());
        Self {
            name: non_empty(name),
            url: non_empty(url),
        }
    }

    /// `true` when exactly one of name and URL is present.
    pub fn is_mismatched(&self) -> bool {
        self.name.is_some() != self.url.is_some()
    }
}

/// Raw secondary entry as posted by the form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SecondaryEntryDraft {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// Permissive decoding of the create-submission body.
///
/// Every field is optional at this stage and unknown keys are ignored;
/// [`SubmissionDraft::validate`] enforces the record's shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionDraft {
    #[serde(default)]
    #[schema(example = "Standup")]
    pub label_one: Option<String>,
    /// A fixed location key, free text, or `custom` together with
    /// `custom_location`.
    #[serde(default)]
    #[schema(example = "location1")]
    pub location: Option<String>,
    #[serde(default)]
    pub custom_location: Option<String>,
    #[serde(default)]
    #[schema(example = "09:00")]
    pub start_time: Option<String>,
    #[serde(default)]
    #[schema(example = "09:15")]
    pub end_time: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub dynamic_fields: Option<Vec<SecondaryEntryDraft>>,
    #[serde(default)]
    #[schema(example = "2024-01-10T09:00:00Z")]
    pub created_at: Option<String>,
}

fn required(field: &'static str, value: Option<String>) -> Result<String, SubmissionValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(SubmissionValidationError::MissingField { field }),
    }
}

fn required_time(field: &str, value: Option<&str>) -> Result<TimeOfDay, SubmissionValidationError> {
    match value {
        Some(value) => TimeOfDay::parse(field, value),
        None => Err(SubmissionValidationError::InvalidTime {
            field: field.to_owned(),
            value: String::new(),
        }),
    }
}

impl SecondaryEntryDraft {
    fn validate(self, index: usize) -> Result<SecondaryEntry, SubmissionValidationError> {
        let label = self
            .label
            .filter(|label| !label.trim().is_empty())
            .unwrap_or_else(|| SECONDARY_LABEL_PLACEHOLDER.to_owned());
        Ok(SecondaryEntry {
            label,
            value: self.value.unwrap_or_default(),
            start_time: required_time(
                &format!("dynamic_fields[{index}].start_time"),
                self.start_time.as_deref(),
            )?,
            end_time: required_time(
                &format!("dynamic_fields[{index}].end_time"),
                self.end_time.as_deref(),
            )?,
        })
    }
}

impl SubmissionDraft {
    /// Validate the draft into a record ready for the store.
    ///
    /// Rules:
    /// - `label_one` and `location` must be non-empty after trimming;
    /// - `location = "custom"` takes the free text from `custom_location`;
    /// - every time must be `HH:MM` or `HH:MM:SS` (end may precede start);
    /// - `created_at` must be RFC 3339;
    /// - blank secondary labels become [`SECONDARY_LABEL_PLACEHOLDER`].
    pub fn validate(self) -> Result<NewSubmission, SubmissionValidationError> {
        let primary_label = required("label_one", self.label_one)?;
        let location = match required("location", self.location)? {
            sentinel if sentinel == CUSTOM_LOCATION_SENTINEL => self
                .custom_location
                .filter(|text| !text.trim().is_empty())
                .ok_or(SubmissionValidationError::MissingCustomLocation)?,
            location => location,
        };
        let primary_start = required_time("start_time", self.start_time.as_deref())?;
        let primary_end = required_time("end_time", self.end_time.as_deref())?;

        let raw_created_at = required("created_at", self.created_at)?;
        let created_at = DateTime::parse_from_rfc3339(raw_created_at.trim())
            .map_err(|_| SubmissionValidationError::InvalidTimestamp {
                value: raw_created_at.clone(),
            })?
            .with_timezone(&Utc);

        let secondary_entries = self
            .dynamic_fields
            .unwrap_or_default()
            .into_iter()
            .enumerate()
            .map(|(index, entry)| entry.validate(index))
            .collect::<Result<Vec<_>, _>>()?;

        let attachment = Attachment::from_parts(self.file_name, self.file_url);
        if attachment.is_mismatched() {
            warn!(
                file_name = ?attachment.name,
                file_url = ?attachment.url,
                "submission attachment has only one of name and url"
            );
        }

        Ok(NewSubmission {
            primary_label,
            location,
            primary_start,
            primary_end,
            attachment,
            secondary_entries,
            created_at,
        })
    }
}

/// A validated submission that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSubmission {
    pub primary_label: String,
    pub location: String,
    pub primary_start: TimeOfDay,
    pub primary_end: TimeOfDay,
    pub attachment: Attachment,
    pub secondary_entries: Vec<SecondaryEntry>,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    /// Attach the store-assigned id.
    pub fn into_stored(self, id: SubmissionId) -> Submission {
        Submission { id, record: self }
    }
}

/// A stored submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    id: SubmissionId,
    record: NewSubmission,
}

impl Submission {
    pub fn id(&self) -> SubmissionId {
        self.id
    }

    pub fn primary_label(&self) -> &str {
        &self.record.primary_label
    }

    pub fn location(&self) -> &str {
        &self.record.location
    }

    pub fn primary_start(&self) -> &TimeOfDay {
        &self.record.primary_start
    }

    pub fn primary_end(&self) -> &TimeOfDay {
        &self.record.primary_end
    }

    pub fn attachment(&self) -> &Attachment {
        &self.record.attachment
    }

    /// Secondary entries in submission order.
    pub fn secondary_entries(&self) -> &[SecondaryEntry] {
        &self.record.secondary_entries
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.record.created_at
    }
}

/// Wire representation of a stored [`Submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionDto {
    pub id: SubmissionId,
    #[schema(example = "Standup")]
    pub label_one: String,
    #[schema(example = "location1")]
    pub location: String,
    pub start_time: TimeOfDay,
    pub end_time: TimeOfDay,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub dynamic_fields: Vec<SecondaryEntry>,
    #[schema(example = "2024-01-10T09:00:00Z")]
    pub created_at: String,
}

impl From<&Submission> for SubmissionDto {
    fn from(value: &Submission) -> Self {
        let record = &value.record;
        Self {
            id: value.id,
            label_one: record.primary_label.clone(),
            location: record.location.clone(),
            start_time: record.primary_start.clone(),
            end_time: record.primary_end.clone(),
            file_name: record.attachment.name.clone(),
            file_url: record.attachment.url.clone(),
            dynamic_fields: record.secondary_entries.clone(),
            created_at: record.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
        }
    }
}

#[cfg(test)]
mod tests;
