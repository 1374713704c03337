//! HTTP inbound adapter: JSON API, attachment endpoints and HTML pages.
//!
//! [`configure`] mounts every route. The caller supplies
//! `web::Data<HttpState>` and `web::Data<HealthState>` and wraps the app in
//! [`crate::middleware::SessionGuard`], the session middleware and
//! [`crate::middleware::Trace`], in that order from the inside out.

use actix_web::web;

pub mod auth;
pub mod data;
pub mod error;
pub mod health;
pub mod pages;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod uploads;

pub use error::ApiResult;

/// Default cap on an uploaded attachment body.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Limits applied to request bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteOptions {
    pub max_upload_bytes: usize,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Mount every route with default limits.
pub fn configure(cfg: &mut web::ServiceConfig) {
    configure_with(cfg, RouteOptions::default());
}

/// Mount every route.
pub fn configure_with(cfg: &mut web::ServiceConfig, options: RouteOptions) {
    cfg.app_data(web::PayloadConfig::new(options.max_upload_bytes))
        .service(health::ready)
        .service(health::live)
        .service(health::store_health)
        .service(auth::scope())
        .service(data::scope())
        .service(uploads::upload)
        .service(uploads::download)
        .configure(pages::configure);
}
