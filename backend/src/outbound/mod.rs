//! Outbound adapters implementing the driven ports.
//!
//! - **persistence**: PostgreSQL stores built on Diesel
//! - **memory**: in-process stores for development and tests
//! - **blob**: filesystem attachment storage
//! - **hashing**: bcrypt password hashing
//! - **identity**: OAuth 2.0 federated sign-in
//!
//! Adapters translate between domain types and infrastructure
//! representations and carry no business rules.

pub mod blob;
pub mod hashing;
pub mod identity;
pub mod memory;
pub mod persistence;
