//! View models for the server-rendered pages.
//!
//! Everything here is a pure function of submission data: the list view maps
//! each [`Submission`] to a [`DayCard`], and the entry form collects fields
//! into an [`EntryForm`] before turning them into a [`SubmissionDraft`].

use chrono::{DateTime, SecondsFormat, Utc};
use url::Url;

use crate::domain::{
    CUSTOM_LOCATION_SENTINEL, SECONDARY_LABEL_PLACEHOLDER, SecondaryEntryDraft, Submission,
    SubmissionDraft,
};

/// Link text used when an attachment has a URL but no name.
pub const ATTACHMENT_FALLBACK_TEXT: &str = "File";

/// One labelled time block on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeBlock {
    pub label: String,
    /// Free-text value of a secondary entry; `None` for the primary block.
    pub value: Option<String>,
    pub start_time: String,
    pub end_time: String,
}

/// Path under which this server serves uploaded attachments.
const SERVED_BLOB_PREFIX: &str = "/blobs/";

/// Link to an uploaded attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentLink {
    /// Navigable target; `None` when the stored URL is not safe to link,
    /// in which case only the text is shown.
    pub href: Option<String>,
    pub text: String,
}

/// Stored attachment URLs are caller supplied. Only absolute `http`/`https`
/// URLs and this server's own blob paths become links.
fn linkable_href(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with(SERVED_BLOB_PREFIX) {
        return Some(trimmed.to_owned());
    }
    Url::parse(trimmed)
        .ok()
        .filter(|url| matches!(url.scheme(), "http" | "https"))
        .map(String::from)
}

/// Card rendered for a stored submission in the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCard {
    /// Day and month in en-GB form, e.g. `10 January`.
    pub date_label: String,
    /// Human-readable location.
    pub location: String,
    /// Primary block first, then secondary blocks in stored order.
    pub blocks: Vec<TimeBlock>,
    pub attachment: Option<AttachmentLink>,
}

/// Format `created_at` as day and month, e.g. `10 January`.
pub fn date_label(created_at: DateTime<Utc>) -> String {
    created_at.format("%-d %B").to_string()
}

impl DayCard {
    pub fn from_submission(submission: &Submission) -> Self {
        let primary = TimeBlock {
            label: submission.primary_label().to_owned(),
            value: None,
            start_time: submission.primary_start().to_string(),
            end_time: submission.primary_end().to_string(),
        };
        let secondary = submission.secondary_entries().iter().map(|entry| TimeBlock {
            label: entry.label.clone(),
            value: Some(entry.value.clone()),
            start_time: entry.start_time.to_string(),
            end_time: entry.end_time.to_string(),
        });

        let attachment = submission.attachment();
        let attachment = attachment.url.as_deref().map(|href| AttachmentLink {
            href: linkable_href(href),
            text: attachment
                .name
                .clone()
                .unwrap_or_else(|| ATTACHMENT_FALLBACK_TEXT.to_owned()),
        });

        Self {
            date_label: date_label(submission.created_at()),
            location: LocationChoice::display_stored(submission.location()),
            blocks: std::iter::once(primary).chain(secondary).collect(),
            attachment,
        }
    }
}

/// Location options offered by the entry form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocationChoice {
    OfficeBuildingA,
    ConferenceRoomB,
    DowntownOffice,
    /// Free-text location typed by the user.
    Custom(String),
}

impl LocationChoice {
    /// Fixed options in display order.
    pub const FIXED: [LocationChoice; 3] = [
        LocationChoice::OfficeBuildingA,
        LocationChoice::ConferenceRoomB,
        LocationChoice::DowntownOffice,
    ];

    /// Form value posted for this choice.
    pub fn key(&self) -> &str {
        match self {
            Self::OfficeBuildingA => "location1",
            Self::ConferenceRoomB => "location2",
            Self::DowntownOffice => "location3",
            Self::Custom(_) => CUSTOM_LOCATION_SENTINEL,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::OfficeBuildingA => "Office Building A",
            Self::ConferenceRoomB => "Conference Room B",
            Self::DowntownOffice => "Downtown Office",
            Self::Custom(text) => text.as_str(),
        }
    }

    /// Interpret a select value plus the free-text input.
    ///
    /// Unknown keys are treated as free text so stored values round-trip.
    pub fn from_form(key: &str, custom_text: &str) -> Self {
        match key {
            "location1" => Self::OfficeBuildingA,
            "location2" => Self::ConferenceRoomB,
            "location3" => Self::DowntownOffice,
            CUSTOM_LOCATION_SENTINEL => Self::Custom(custom_text.to_owned()),
            other => Self::Custom(other.to_owned()),
        }
    }

    /// Label for a stored location value: fixed keys map to their names,
    /// anything else is shown verbatim.
    pub fn display_stored(stored: &str) -> String {
        Self::from_form(stored, "").label().to_owned()
    }

    /// Value stored for this choice: the key for fixed options, the text
    /// verbatim for custom ones.
    fn stored_value(&self) -> String {
        match self {
            Self::Custom(text) => text.clone(),
            fixed => fixed.key().to_owned(),
        }
    }
}

/// Secondary block being edited on the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecondaryEntryInput {
    pub label: String,
    pub value: String,
    pub start_time: String,
    pub end_time: String,
}

impl Default for SecondaryEntryInput {
    fn default() -> Self {
        Self {
            label: SECONDARY_LABEL_PLACEHOLDER.to_owned(),
            value: String::new(),
            start_time: String::new(),
            end_time: String::new(),
        }
    }
}

/// Entry form state collected before a single atomic submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryForm {
    pub label_one: String,
    pub location: LocationChoice,
    pub start_time: String,
    pub end_time: String,
    secondary_entries: Vec<SecondaryEntryInput>,
}

impl EntryForm {
    pub fn new(
        label_one: impl Into<String>,
        location: LocationChoice,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            label_one: label_one.into(),
            location,
            start_time: start_time.into(),
            end_time: end_time.into(),
            secondary_entries: Vec::new(),
        }
    }

    /// Append a fresh placeholder-labelled block, filled in by `fill`.
    pub fn add_secondary_entry(&mut self, fill: impl FnOnce(&mut SecondaryEntryInput)) {
        let mut entry = SecondaryEntryInput::default();
        fill(&mut entry);
        self.secondary_entries.push(entry);
    }

    pub fn secondary_entries(&self) -> &[SecondaryEntryInput] {
        &self.secondary_entries
    }

    /// Build the draft posted to the submission API.
    ///
    /// `attachment` is the `(file_name, file_url)` pair returned by a prior
    /// upload, if any.
    pub fn into_draft(
        self,
        created_at: DateTime<Utc>,
        attachment: Option<(String, String)>,
    ) -> SubmissionDraft {
        let (file_name, file_url) = attachment.unzip();
        SubmissionDraft {
            label_one: Some(self.label_one),
            location: Some(self.location.stored_value()),
            custom_location: None,
            start_time: Some(self.start_time),
            end_time: Some(self.end_time),
            file_name,
            file_url,
            dynamic_fields: Some(
                self.secondary_entries
                    .into_iter()
                    .map(|entry| SecondaryEntryDraft {
                        label: Some(entry.label),
                        value: Some(entry.value),
                        start_time: Some(entry.start_time),
                        end_time: Some(entry.end_time),
                    })
                    .collect(),
            ),
            created_at: Some(created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)),
        }
    }
}
