//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{AttachmentUploader, AuthGateway, SubmissionService};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub auth: Arc<dyn AuthGateway>,
    pub submissions: Arc<dyn SubmissionService>,
    pub attachments: Arc<dyn AttachmentUploader>,
}

impl HttpState {
    /// Construct state from the driving ports.
    pub fn new(
        auth: Arc<dyn AuthGateway>,
        submissions: Arc<dyn SubmissionService>,
        attachments: Arc<dyn AttachmentUploader>,
    ) -> Self {
        Self {
            auth,
            submissions,
            attachments,
        }
    }
}
