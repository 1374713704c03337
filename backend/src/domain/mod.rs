//! Domain primitives, services and ports.
//!
//! Purpose: define the strongly typed entities used by the HTTP and
//! persistence layers, the services implementing the driving ports, and the
//! driven ports adapters implement. Nothing here knows about Actix or Diesel.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User and its value types: registered identities.
//! - Submission and its draft/wire types: recorded days.
//! - AuthGatewayService, SubmissionServiceImpl, AttachmentService: services.

pub mod attachment;
pub mod auth;
pub mod auth_service;
pub mod error;
pub mod ports;
pub mod presentation;
pub mod submission;
pub mod submission_service;
pub mod trace_id;
pub mod user;

pub use self::attachment::{
    ATTACHMENT_NAMESPACE, AttachmentService, StoredAttachment, content_type_for, storage_name,
};
pub use self::auth::{CredentialsValidationError, LoginCredentials, Registration, SessionClaims};
pub use self::auth_service::{AuthGatewayService, USER_EXISTS_MESSAGE};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::presentation::{AttachmentLink, DayCard, EntryForm, LocationChoice};
pub use self::submission::{
    Attachment, CUSTOM_LOCATION_SENTINEL, NewSubmission, SECONDARY_LABEL_PLACEHOLDER,
    SecondaryEntry, SecondaryEntryDraft, Submission, SubmissionDraft, SubmissionDto,
    SubmissionId, SubmissionValidationError, TimeOfDay,
};
pub use self::submission_service::SubmissionServiceImpl;
pub use self::trace_id::TraceId;
pub use self::user::{
    DISPLAY_NAME_MAX, DisplayName, Email, PasswordHash, User, UserId, UserValidationError,
};
