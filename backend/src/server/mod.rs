//! Server construction, middleware wiring and shutdown.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, Scope, web};
use tracing::{info, warn};

use users_service::Trace;
#[cfg(debug_assertions)]
use users_service::doc::ApiDoc;
use users_service::domain::UserServiceImpl;
use users_service::inbound::http::api_scope;
use users_service::inbound::http::health::{HealthState, live, ready};
use users_service::inbound::http::state::HttpState;
use users_service::outbound::persistence::DieselUserRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    api: Scope,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Registered last: an empty prefix yields a scope that claims every path.
    app.service(api)
}

/// Construct the Actix server with the Diesel-backed user service.
///
/// Signal handling is left to [`shutdown_on_signal`] so the health state can
/// flip before the listener drains.
///
/// # Errors
///
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        db_pool,
        api_prefix,
        read_timeout,
        disconnect_timeout,
        shutdown_grace,
        store_timeout,
    } = config;

    let repository = DieselUserRepository::new(db_pool, store_timeout);
    let service = UserServiceImpl::new(Arc::new(repository));
    let http_state = web::Data::new(HttpState::new(Arc::new(service)));
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(
            server_health_state.clone(),
            http_state.clone(),
            api_scope(&api_prefix),
        )
    })
    .client_request_timeout(read_timeout)
    .client_disconnect_timeout(disconnect_timeout)
    .shutdown_timeout(shutdown_grace.as_secs())
    .disable_signals()
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}

#[cfg(unix)]
async fn termination_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(error) => {
            warn!(%error, "failed to install SIGTERM handler; waiting for ctrl-c only");
            if let Err(error) = tokio::signal::ctrl_c().await {
                warn!(%error, "failed to listen for ctrl-c");
            }
        }
    }
}

#[cfg(not(unix))]
async fn termination_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
    }
}

/// Wait for SIGINT or SIGTERM, fail the health checks, then stop the server
/// gracefully within its configured shutdown timeout.
pub async fn shutdown_on_signal(handle: ServerHandle, health_state: web::Data<HealthState>) {
    termination_signal().await;
    info!("shutdown signal received; draining connections");
    health_state.mark_unhealthy();
    handle.stop(true).await;
}
