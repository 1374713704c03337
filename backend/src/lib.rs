//! Daybook: record labelled time blocks per day.
//!
//! The crate is laid out as ports and adapters: [`domain`] holds types,
//! services and ports; [`inbound`] adapts HTTP onto the driving ports;
//! [`outbound`] implements the driven ports over PostgreSQL, the filesystem,
//! bcrypt and an OAuth provider.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
