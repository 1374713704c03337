//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{Stores, build_http_state};

use std::future::Future;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use daybook::inbound::http::health::HealthState;
use daybook::inbound::http::session_config::{SessionSettings, session_middleware};
use daybook::inbound::http::state::HttpState;
use daybook::inbound::http::{RouteOptions, configure_with};
use daybook::middleware::{ProtectedRoutes, SessionGuard};
use daybook::Trace;
use tracing::info;
#[cfg(debug_assertions)]
use daybook::doc::ApiDoc;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    session: SessionSettings,
    routes: ProtectedRoutes,
    route_options: RouteOptions,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        session,
        routes,
        route_options,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .configure(|cfg| configure_with(cfg, route_options));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Trace is outermost so guard rejections still carry a trace id.
    app.wrap(SessionGuard::new(routes))
        .wrap(session_middleware(&session))
        .wrap(Trace)
}

/// Bind the HTTP server and mark the service ready.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        session,
        bind_addr,
        http_state,
        routes,
        route_options,
    } = config;

    let deps = AppDependencies {
        health_state: health_state.clone(),
        http_state,
        session,
        routes,
        route_options,
    };
    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}

/// Report the service unready and not live once `shutdown` resolves, so
/// checks fail while workers drain.
pub async fn withdraw_on<F>(health_state: web::Data<HealthState>, shutdown: F)
where
    F: Future<Output = ()>,
{
    shutdown.await;
    info!("shutdown requested; failing health checks");
    health_state.mark_unhealthy();
}
