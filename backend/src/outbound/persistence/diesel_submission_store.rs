//! PostgreSQL-backed [`SubmissionStore`].
//!
//! Rows are read newest first; `seq` keeps insertion order between rows that
//! share a `created_at`. Secondary entries are stored as a JSONB array in
//! submission order.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{SubmissionStore, SubmissionStoreError};
use crate::domain::{
    Attachment, NewSubmission, SecondaryEntry, Submission, SubmissionId, TimeOfDay,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewSubmissionRow, SubmissionRow};
use super::pool::DbPool;
use super::schema::form_submissions;

/// Diesel adapter for the `form_submissions` table.
#[derive(Clone)]
pub struct DieselSubmissionStore {
    pool: DbPool,
}

impl DieselSubmissionStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> SubmissionStoreError {
    map_diesel_error(
        error,
        SubmissionStoreError::query,
        SubmissionStoreError::connection,
    )
}

fn encode_entries(entries: &[SecondaryEntry]) -> Result<serde_json::Value, SubmissionStoreError> {
    serde_json::to_value(entries)
        .map_err(|err| SubmissionStoreError::query(format!("encode dynamic_fields: {err}")))
}

fn row_to_submission(row: SubmissionRow) -> Result<Submission, SubmissionStoreError> {
    let SubmissionRow {
        id,
        label_one,
        location,
        start_time,
        end_time,
        file_name,
        file_url,
        dynamic_fields,
        created_at,
    } = row;

    let secondary_entries: Vec<SecondaryEntry> = serde_json::from_value(dynamic_fields)
        .map_err(|err| SubmissionStoreError::query(format!("decode dynamic_fields: {err}")))?;

    let record = NewSubmission {
        primary_label: label_one,
        location,
        primary_start: TimeOfDay::from_stored(start_time),
        primary_end: TimeOfDay::from_stored(end_time),
        attachment: Attachment::from_parts(file_name, file_url),
        secondary_entries,
        created_at,
    };
    Ok(record.into_stored(SubmissionId::from_uuid(id)))
}

#[async_trait]
impl SubmissionStore for DieselSubmissionStore {
    async fn append(&self, record: &NewSubmission) -> Result<Submission, SubmissionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubmissionStoreError::connection))?;

        let id = SubmissionId::random();
        let row = NewSubmissionRow {
            id: *id.as_uuid(),
            label_one: &record.primary_label,
            location: &record.location,
            start_time: record.primary_start.as_str(),
            end_time: record.primary_end.as_str(),
            file_name: record.attachment.name.as_deref(),
            file_url: record.attachment.url.as_deref(),
            dynamic_fields: encode_entries(&record.secondary_entries)?,
            created_at: record.created_at,
        };

        diesel::insert_into(form_submissions::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_error)?;

        Ok(record.clone().into_stored(id))
    }

    async fn list_newest_first(&self) -> Result<Vec<Submission>, SubmissionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubmissionStoreError::connection))?;

        let rows = form_submissions::table
            .order((
                form_submissions::created_at.desc(),
                form_submissions::seq.asc(),
            ))
            .select(SubmissionRow::as_select())
            .load::<SubmissionRow>(&mut conn)
            .await
            .map_err(map_error)?;

        rows.into_iter().map(row_to_submission).collect()
    }

    async fn ping(&self) -> Result<(), SubmissionStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, SubmissionStoreError::connection))?;

        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(map_error)?;
        Ok(())
    }
}
