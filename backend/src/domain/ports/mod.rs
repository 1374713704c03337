//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (stores, hasher, identity provider) are implemented by
//! outbound adapters. Driving ports (`AuthGateway`, `SubmissionService`,
//! `AttachmentUploader`) are implemented by domain services and consumed by
//! inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod attachment_uploader;
mod auth_gateway;
mod blob_store;
mod credential_store;
mod identity_provider;
mod password_hasher;
mod submission_service;
mod submission_store;

#[cfg(test)]
pub use attachment_uploader::MockAttachmentUploader;
pub use attachment_uploader::{AttachmentContent, AttachmentUploader};
#[cfg(test)]
pub use auth_gateway::MockAuthGateway;
pub use auth_gateway::AuthGateway;
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use blob_store::{BlobKey, BlobStore, BlobStoreError};
#[cfg(test)]
pub use credential_store::MockCredentialStore;
pub use credential_store::{CredentialStore, CredentialStoreError};
#[cfg(test)]
pub use identity_provider::MockFederatedIdentityProvider;
pub use identity_provider::{
    DisabledIdentityProvider, FederatedIdentity, FederatedIdentityProvider, IdentityProviderError,
};
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHashError, PasswordHasher};
#[cfg(test)]
pub use submission_service::MockSubmissionService;
pub use submission_service::SubmissionService;
#[cfg(test)]
pub use submission_store::MockSubmissionStore;
pub use submission_store::{SubmissionStore, SubmissionStoreError};
