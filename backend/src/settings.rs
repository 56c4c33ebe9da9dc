//! Service settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USERS_*` environment variables or a config
//! file. Unset optional values fall back to the defaults below; only the
//! database URL is mandatory.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_HTTP_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 30;
const DEFAULT_DATABASE_MAX_CONNECTIONS: u32 = 30;
const DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS: u64 = 5;
const DEFAULT_STORE_TIMEOUT_SECS: u64 = 5;
const DEFAULT_API_PREFIX: &str = "/api";

/// Deployment mode; selects the log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Human-readable logs.
    Development,
    /// JSON logs.
    Production,
}

/// Settings that fail validation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("database url must be set (USERS_DATABASE_URL)")]
    MissingDatabaseUrl,
    #[error("unknown mode `{0}`; expected `development` or `production`")]
    UnknownMode(String),
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
    #[error("api prefix `{0}` must start with `/`")]
    InvalidApiPrefix(String),
}

/// Runtime configuration for the users service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct ServiceSettings {
    /// `development` (default) or `production`.
    pub mode: Option<String>,
    /// Address to bind; defaults to all interfaces.
    pub http_host: Option<IpAddr>,
    /// Port to bind; defaults to 8080.
    pub http_port: Option<u16>,
    /// Seconds allowed for a client to send request headers.
    pub http_read_timeout_secs: Option<u64>,
    /// Seconds a client gets to acknowledge a closing connection once the
    /// response is written. Actix has no per-response write deadline.
    pub http_disconnect_timeout_secs: Option<u64>,
    /// Seconds in-flight requests get to finish during shutdown.
    pub shutdown_grace_secs: Option<u64>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Pool size upper bound.
    pub database_max_connections: Option<u32>,
    /// Seconds allowed to connect to, or check out from, the pool.
    pub database_connect_timeout_secs: Option<u64>,
    /// Seconds a single store operation may take.
    pub store_timeout_secs: Option<u64>,
    /// Path prefix for the user routes; defaults to `/api`.
    pub api_prefix: Option<String>,
}

fn secs(value: Option<u64>, default: u64) -> Duration {
    Duration::from_secs(value.unwrap_or(default))
}

impl ServiceSettings {
    /// Check every value, returning the first offending one.
    ///
    /// # Errors
    ///
    /// See [`SettingsError`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.mode()?;
        if self.database_url().is_none() {
            return Err(SettingsError::MissingDatabaseUrl);
        }
        let positive = [
            ("http_port", u64::from(self.http_port.unwrap_or(DEFAULT_HTTP_PORT))),
            (
                "database_max_connections",
                u64::from(self.database_max_connections()),
            ),
            ("http_read_timeout_secs", self.http_read_timeout().as_secs()),
            (
                "http_disconnect_timeout_secs",
                self.http_disconnect_timeout().as_secs(),
            ),
            (
                "database_connect_timeout_secs",
                self.database_connect_timeout().as_secs(),
            ),
            ("store_timeout_secs", self.store_timeout().as_secs()),
        ];
        if let Some((name, _)) = positive.iter().find(|(_, value)| *value == 0) {
            return Err(SettingsError::Zero(*name));
        }
        if !self.api_prefix().starts_with('/') {
            return Err(SettingsError::InvalidApiPrefix(self.api_prefix().to_owned()));
        }
        Ok(())
    }

    /// Parsed deployment mode.
    ///
    /// # Errors
    ///
    /// [`SettingsError::UnknownMode`] for anything but the two known names.
    pub fn mode(&self) -> Result<RunMode, SettingsError> {
        match self.mode.as_deref().map(str::trim) {
            None | Some("development") => Ok(RunMode::Development),
            Some("production") => Ok(RunMode::Production),
            Some(other) => Err(SettingsError::UnknownMode(other.to_owned())),
        }
    }

    /// Socket address the server binds.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.http_host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.http_port.unwrap_or(DEFAULT_HTTP_PORT),
        )
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
    }

    /// Pool size upper bound.
    #[must_use]
    pub fn database_max_connections(&self) -> u32 {
        self.database_max_connections
            .unwrap_or(DEFAULT_DATABASE_MAX_CONNECTIONS)
    }

    /// Deadline for opening a store connection or checking one out.
    #[must_use]
    pub fn database_connect_timeout(&self) -> Duration {
        secs(
            self.database_connect_timeout_secs,
            DEFAULT_DATABASE_CONNECT_TIMEOUT_SECS,
        )
    }

    /// Time a client has to send the request head.
    #[must_use]
    pub fn http_read_timeout(&self) -> Duration {
        secs(self.http_read_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Time a client has to acknowledge connection shutdown.
    #[must_use]
    pub fn http_disconnect_timeout(&self) -> Duration {
        secs(self.http_disconnect_timeout_secs, DEFAULT_HTTP_TIMEOUT_SECS)
    }

    /// Time in-flight requests get to finish after a termination signal.
    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        secs(self.shutdown_grace_secs, DEFAULT_SHUTDOWN_GRACE_SECS)
    }

    /// Deadline for a single store operation, checkout included.
    #[must_use]
    pub fn store_timeout(&self) -> Duration {
        secs(self.store_timeout_secs, DEFAULT_STORE_TIMEOUT_SECS)
    }

    /// Path prefix the user routes are mounted under.
    #[must_use]
    pub fn api_prefix(&self) -> &str {
        self.api_prefix.as_deref().unwrap_or(DEFAULT_API_PREFIX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const KEYS: [&str; 11] = [
        "USERS_MODE",
        "USERS_HTTP_HOST",
        "USERS_HTTP_PORT",
        "USERS_HTTP_READ_TIMEOUT_SECS",
        "USERS_HTTP_DISCONNECT_TIMEOUT_SECS",
        "USERS_SHUTDOWN_GRACE_SECS",
        "USERS_DATABASE_URL",
        "USERS_DATABASE_MAX_CONNECTIONS",
        "USERS_DATABASE_CONNECT_TIMEOUT_SECS",
        "USERS_STORE_TIMEOUT_SECS",
        "USERS_API_PREFIX",
    ];

    fn env_with(overrides: &[(&str, &str)]) -> Vec<(&'static str, Option<String>)> {
        KEYS.iter()
            .map(|key| {
                let value = overrides
                    .iter()
                    .find(|(name, _)| name == key)
                    .map(|(_, value)| (*value).to_owned());
                (*key, value)
            })
            .collect()
    }

    fn load() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("users-service")])
            .expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let _guard = lock_env(env_with(&[]));

        let settings = load();
        assert_eq!(settings.mode(), Ok(RunMode::Development));
        assert_eq!(settings.bind_addr(), "0.0.0.0:8080".parse().expect("addr"));
        assert_eq!(settings.http_read_timeout(), Duration::from_secs(10));
        assert_eq!(settings.http_disconnect_timeout(), Duration::from_secs(10));
        assert_eq!(settings.shutdown_grace(), Duration::from_secs(30));
        assert_eq!(settings.database_max_connections(), 30);
        assert_eq!(settings.database_connect_timeout(), Duration::from_secs(5));
        assert_eq!(settings.store_timeout(), Duration::from_secs(5));
        assert_eq!(settings.api_prefix(), "/api");
        assert_eq!(settings.validate(), Err(SettingsError::MissingDatabaseUrl));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(env_with(&[
            ("USERS_MODE", "production"),
            ("USERS_HTTP_HOST", "127.0.0.1"),
            ("USERS_HTTP_PORT", "9090"),
            ("USERS_HTTP_DISCONNECT_TIMEOUT_SECS", "3"),
            ("USERS_DATABASE_URL", "postgres://localhost/users"),
            ("USERS_DATABASE_MAX_CONNECTIONS", "4"),
            ("USERS_STORE_TIMEOUT_SECS", "2"),
            ("USERS_API_PREFIX", "/v2"),
        ]));

        let settings = load();
        assert_eq!(settings.mode(), Ok(RunMode::Production));
        assert_eq!(settings.bind_addr(), "127.0.0.1:9090".parse().expect("addr"));
        assert_eq!(settings.database_url(), Some("postgres://localhost/users"));
        assert_eq!(settings.http_disconnect_timeout(), Duration::from_secs(3));
        assert_eq!(settings.database_max_connections(), 4);
        assert_eq!(settings.store_timeout(), Duration::from_secs(2));
        assert_eq!(settings.api_prefix(), "/v2");
        assert_eq!(settings.validate(), Ok(()));
    }

    #[rstest]
    #[case("USERS_MODE", "staging", SettingsError::UnknownMode("staging".to_owned()))]
    #[case("USERS_DATABASE_URL", "  ", SettingsError::MissingDatabaseUrl)]
    #[case("USERS_DATABASE_MAX_CONNECTIONS", "0", SettingsError::Zero("database_max_connections"))]
    #[case("USERS_STORE_TIMEOUT_SECS", "0", SettingsError::Zero("store_timeout_secs"))]
    #[case(
        "USERS_HTTP_DISCONNECT_TIMEOUT_SECS",
        "0",
        SettingsError::Zero("http_disconnect_timeout_secs")
    )]
    #[case("USERS_API_PREFIX", "api", SettingsError::InvalidApiPrefix("api".to_owned()))]
    fn validation_rejects(#[case] key: &str, #[case] value: &str, #[case] expected: SettingsError) {
        let mut overrides = vec![("USERS_DATABASE_URL", "postgres://localhost/users")];
        overrides.retain(|(name, _)| *name != key);
        overrides.push((key, value));
        let _guard = lock_env(env_with(&overrides));

        assert_eq!(load().validate(), Err(expected));
    }
}
