//! Connection pool shared by the Diesel adapters.
//!
//! [`DbPool::connect`] opens `min_idle` connections before it returns, so an
//! unreachable database fails startup rather than the first request.
//! Checking a connection out is left to each adapter, which runs it under its
//! own deadline and reports failures in its port's vocabulary.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::Pool;

/// Pool sizing and timeouts.
///
/// Start from [`PoolConfig::new`] and override fields with struct update
/// syntax:
///
/// ```
/// use std::time::Duration;
/// use users_service::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig {
///     max_size: 4,
///     connection_timeout: Duration::from_millis(500),
///     ..PoolConfig::new("postgres://localhost/users")
/// };
/// assert_eq!(config.min_idle, Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolConfig {
    /// PostgreSQL connection string.
    pub database_url: String,
    /// Upper bound on open connections.
    pub max_size: u32,
    /// Connections kept open while idle; `None` opens nothing up front.
    pub min_idle: Option<u32>,
    /// Deadline for establishing a connection and for each checkout.
    pub connection_timeout: Duration,
}

impl PoolConfig {
    /// Pool size used when none is configured.
    pub const DEFAULT_MAX_SIZE: u32 = 30;
    /// Connect and checkout deadline used when none is configured.
    pub const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(5);

    /// Defaults for `database_url`: thirty connections with one kept warm.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: Self::DEFAULT_MAX_SIZE,
            min_idle: Some(1),
            connection_timeout: Self::DEFAULT_CONNECTION_TIMEOUT,
        }
    }
}

/// The pool could not be built.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to build connection pool: {message}")]
pub struct PoolError {
    message: String,
}

/// Shared handle to the bb8 pool. Cloning is cheap.
#[derive(Clone)]
pub struct DbPool(Pool<AsyncPgConnection>);

impl DbPool {
    /// Build the pool and open its initial idle connections.
    ///
    /// # Errors
    ///
    /// [`PoolError`] when the URL is invalid or the server cannot be reached
    /// within `connection_timeout`.
    pub async fn connect(config: &PoolConfig) -> Result<Self, PoolError> {
        let manager =
            AsyncDieselConnectionManager::<AsyncPgConnection>::new(config.database_url.as_str());
        Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map(Self)
            .map_err(|err| PoolError {
                message: err.to_string(),
            })
    }

    pub(super) fn connections(&self) -> &Pool<AsyncPgConnection> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn defaults_match_service_settings() {
        let config = PoolConfig::new("postgres://localhost/users");

        assert_eq!(config.database_url, "postgres://localhost/users");
        assert_eq!(config.max_size, 30);
        assert_eq!(config.min_idle, Some(1));
        assert_eq!(config.connection_timeout, Duration::from_secs(5));
    }

    #[tokio::test]
    async fn lazy_pool_builds_without_a_server() {
        let config = PoolConfig {
            min_idle: None,
            ..PoolConfig::new("postgres://127.0.0.1:1/unreachable")
        };
        assert!(DbPool::connect(&config).await.is_ok());
    }

    #[rstest]
    fn build_error_names_the_cause() {
        let err = PoolError {
            message: "invalid connection string".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to build connection pool: invalid connection string"
        );
    }
}
