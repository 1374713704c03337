//! Server entry point: loads settings, selects adapters and starts Actix.

mod server;

use std::io;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use daybook::config::AppSettings;
use daybook::inbound::http::RouteOptions;
use daybook::inbound::http::health::HealthState;
use daybook::inbound::http::session_config::fingerprint::KeyFingerprint;
use daybook::inbound::http::session_config::{BuildMode, session_settings_from_env};
use daybook::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};

use server::{ServerConfig, Stores, build_http_state, create_server, withdraw_on};

async fn connect(settings: &AppSettings) -> io::Result<Option<DbPool>> {
    let Some(url) = settings.database_url() else {
        warn!("DAYBOOK_DATABASE_URL not set; using in-memory stores");
        return Ok(None);
    };
    run_pending_migrations(url).await.map_err(io::Error::other)?;
    let pool = DbPool::new(PoolConfig::new(url))
        .await
        .map_err(io::Error::other)?;
    Ok(Some(pool))
}

// Resolves on Ctrl-C; never resolves when the handler cannot be installed.
async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(err.to_string()))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(io::Error::other)?;
    info!(fingerprint = %KeyFingerprint::of(&session.key), "session key loaded");

    let bind_addr = settings.bind_addr().map_err(io::Error::other)?;
    let pool = connect(&settings).await?;
    let http_state = build_http_state(&settings, Stores::from_pool(pool))?;
    let config = ServerConfig::new(session, bind_addr, http_state)
        .with_routes(settings.protected_routes())
        .with_route_options(RouteOptions {
            max_upload_bytes: settings.max_upload_bytes(),
        });

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    actix_web::rt::spawn(withdraw_on(health_state, shutdown_signal()));
    info!(%bind_addr, "listening");
    server.await
}
