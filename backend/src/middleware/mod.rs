//! Request middleware.
//!
//! Purpose: define middleware components for request lifecycle concerns:
//! trace correlation and session enforcement.

pub mod session_guard;
pub mod trace;

pub use session_guard::{ProtectedRoutes, SessionGuard};
pub use trace::Trace;
