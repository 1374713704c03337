//! PostgreSQL persistence adapters built on Diesel.

mod diesel_credential_store;
mod diesel_error_mapping;
mod diesel_submission_store;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_credential_store::DieselCredentialStore;
pub use diesel_submission_store::DieselSubmissionStore;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
