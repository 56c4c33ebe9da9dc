//! Users service entry-point: loads settings, prepares the database and runs
//! the HTTP server until a termination signal arrives.

mod server;

use std::ffi::OsString;
use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server, shutdown_on_signal};
use users_service::inbound::http::health::HealthState;
use users_service::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use users_service::settings::{RunMode, ServiceSettings};

fn init_tracing(mode: RunMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    let result = match mode {
        RunMode::Production => builder.json().try_init(),
        RunMode::Development => builder.try_init(),
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn load_settings(args: Vec<OsString>) -> io::Result<ServiceSettings> {
    let settings = ServiceSettings::load_from_iter(args)
        .map_err(|err| io::Error::other(format!("failed to load settings: {err}")))?;
    settings
        .validate()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err))?;
    Ok(settings)
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    let settings = load_settings(std::env::args_os().collect())?;
    init_tracing(settings.mode().map_err(io::Error::other)?);

    let database_url = settings
        .database_url()
        .ok_or_else(|| io::Error::other("database url must be set"))?;

    let applied = run_pending_migrations(database_url)
        .await
        .map_err(io::Error::other)?;
    info!(applied, "database schema is up to date");

    let pool = DbPool::connect(&PoolConfig {
        max_size: settings.database_max_connections(),
        connection_timeout: settings.database_connect_timeout(),
        ..PoolConfig::new(database_url)
    })
    .await
    .map_err(io::Error::other)?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::from_settings(&settings, pool);
    let bind_addr = config.bind_addr();
    let server = create_server(health_state.clone(), config)?;

    actix_web::rt::spawn(shutdown_on_signal(server.handle(), health_state));
    info!(%bind_addr, prefix = settings.api_prefix(), "users service listening");

    server.await?;
    info!("users service stopped");
    Ok(())
}
