//! PostgreSQL-backed [`CredentialStore`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CredentialStore, CredentialStoreError};
use crate::domain::{DisplayName, Email, PasswordHash, User, UserId};

use super::diesel_error_mapping::{is_unique_violation, map_diesel_error, map_pool_error};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel adapter for the `users` table.
#[derive(Clone)]
pub struct DieselCredentialStore {
    pool: DbPool,
}

impl DieselCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_error(error: diesel::result::Error) -> CredentialStoreError {
    map_diesel_error(
        error,
        CredentialStoreError::query,
        CredentialStoreError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, CredentialStoreError> {
    let UserRow {
        id,
        email,
        name,
        password_hash,
        created_at,
    } = row;
    let email = Email::new(email).map_err(|err| CredentialStoreError::query(err.to_string()))?;
    let display_name =
        DisplayName::new(name).map_err(|err| CredentialStoreError::query(err.to_string()))?;
    Ok(User::new(
        UserId::from_uuid(id),
        email,
        display_name,
        password_hash.map(PasswordHash::new),
        created_at,
    ))
}

#[async_trait]
impl CredentialStore for DieselCredentialStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, CredentialStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CredentialStoreError::connection))?;

        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first::<UserRow>(&mut conn)
            .await
            .optional()
            .map_err(map_error)?;

        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), CredentialStoreError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_pool_error(err, CredentialStoreError::connection))?;

        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            name: user.display_name().as_ref(),
            password_hash: user.password_hash().map(PasswordHash::as_str),
            created_at: user.created_at(),
        };

        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    CredentialStoreError::duplicate_email(user.email().to_string())
                } else {
                    map_error(err)
                }
            })?;
        Ok(())
    }
}
