//! Diesel row structs. Never exposed outside the persistence adapters.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{form_submissions, users};

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub password_hash: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = form_submissions)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SubmissionRow {
    pub id: Uuid,
    pub label_one: String,
    pub location: String,
    pub start_time: String,
    pub end_time: String,
    pub file_name: Option<String>,
    pub file_url: Option<String>,
    pub dynamic_fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// `seq` is assigned by the database.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = form_submissions)]
pub(crate) struct NewSubmissionRow<'a> {
    pub id: Uuid,
    pub label_one: &'a str,
    pub location: &'a str,
    pub start_time: &'a str,
    pub end_time: &'a str,
    pub file_name: Option<&'a str>,
    pub file_url: Option<&'a str>,
    pub dynamic_fields: serde_json::Value,
    pub created_at: DateTime<Utc>,
}
