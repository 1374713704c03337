//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::web;
use daybook::inbound::http::RouteOptions;
use daybook::inbound::http::session_config::SessionSettings;
use daybook::inbound::http::state::HttpState;
use daybook::middleware::ProtectedRoutes;

/// Everything [`super::create_server`] needs besides the health state.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) http_state: web::Data<HttpState>,
    pub(crate) routes: ProtectedRoutes,
    pub(crate) route_options: RouteOptions,
}

impl ServerConfig {
    /// Configuration with the default guard rules and body limits.
    #[must_use]
    pub fn new(
        session: SessionSettings,
        bind_addr: SocketAddr,
        http_state: web::Data<HttpState>,
    ) -> Self {
        Self {
            session,
            bind_addr,
            http_state,
            routes: ProtectedRoutes::default(),
            route_options: RouteOptions::default(),
        }
    }

    #[must_use]
    pub fn with_routes(mut self, routes: ProtectedRoutes) -> Self {
        self.routes = routes;
        self
    }

    #[must_use]
    pub fn with_route_options(mut self, options: RouteOptions) -> Self {
        self.route_options = options;
        self
    }
}
