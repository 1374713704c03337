//! Health endpoints.
//!
//! `/health/ready` and `/health/live` are orchestration health checks
//! driven by [`HealthState`]. `/api/health` checks that the submission store answers
//! and reports the outcome as JSON.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::inbound::http::state::HttpState;

/// Shared health state for readiness and liveness checks.
pub struct HealthState {
    ready: AtomicBool,
    live: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            ready: AtomicBool::new(false),
            live: AtomicBool::new(true),
        }
    }
}

impl HealthState {
    /// Create a new health state starting as not ready but live.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Report unhealthy so both checks fail during shutdown.
    pub fn mark_unhealthy(&self) {
        self.ready.store(false, Ordering::Release);
        self.live.store(false, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    pub fn is_alive(&self) -> bool {
        self.live.load(Ordering::Acquire)
    }

    fn status_response(healthy: bool) -> HttpResponse {
        let mut response = if healthy {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Readiness check: 200 once dependencies are initialised, 503 before.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::status_response(state.is_ready())
}

/// Liveness check: 200 while alive, 503 once draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::status_response(state.is_alive())
}

/// Store connectivity report.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StoreHealth {
    /// `success` or `error`.
    #[schema(example = "success")]
    pub status: String,
    #[schema(example = "Submission store reachable")]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Check that the submission store answers.
#[utoipa::path(
    get,
    path = "/api/health",
    tags = ["health"],
    responses(
        (status = 200, description = "Store reachable", body = StoreHealth),
        (status = 401, description = "Login required"),
        (status = 500, description = "Store unreachable", body = StoreHealth)
    )
)]
#[get("/api/health")]
pub async fn store_health(state: web::Data<HttpState>) -> HttpResponse {
    let (mut response, report) = match state.submissions.check_store().await {
        Ok(()) => (
            HttpResponse::Ok(),
            StoreHealth {
                status: "success".to_owned(),
                message: "Submission store reachable".to_owned(),
                error: None,
            },
        ),
        Err(err) => {
            warn!(error = %err, "submission store health check failed");
            (
                HttpResponse::InternalServerError(),
                StoreHealth {
                    status: "error".to_owned(),
                    message: "Submission store unreachable".to_owned(),
                    error: Some(err.diagnostic().unwrap_or(err.message()).to_owned()),
                },
            )
        }
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(report)
}
