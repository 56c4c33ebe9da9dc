//! HTTP server configuration object.

use std::net::SocketAddr;
use std::time::Duration;

use users_service::outbound::persistence::DbPool;
use users_service::settings::ServiceSettings;

/// Everything `create_server` needs besides the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) api_prefix: String,
    pub(crate) read_timeout: Duration,
    pub(crate) disconnect_timeout: Duration,
    pub(crate) shutdown_grace: Duration,
    pub(crate) store_timeout: Duration,
}

impl ServerConfig {
    /// Derive the server configuration from validated settings.
    #[must_use]
    pub fn from_settings(settings: &ServiceSettings, db_pool: DbPool) -> Self {
        Self {
            bind_addr: settings.bind_addr(),
            db_pool,
            api_prefix: settings.api_prefix().to_owned(),
            read_timeout: settings.http_read_timeout(),
            disconnect_timeout: settings.http_disconnect_timeout(),
            shutdown_grace: settings.shutdown_grace(),
            store_timeout: settings.store_timeout(),
        }
    }

    /// Socket address the server binds to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
