//! PostgreSQL provisioning for the repository integration tests.
//!
//! Each test gets its own freshly migrated database. By default it lives in
//! the shared embedded cluster from `pg-embed-setup-unpriv`; setting
//! `TEST_DATABASE_URL` points the suite at an existing server instead.
//!
//! A setup failure panics. Set `SKIP_TEST_CLUSTER=1` to turn it into a
//! printed skip marker on machines that cannot run PostgreSQL.

use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use tokio::runtime::Runtime;
use users_service::outbound::persistence::{
    DbPool, DieselUserRepository, PoolConfig, run_pending_migrations,
};
use uuid::Uuid;

static MIGRATION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

/// True when `SKIP_TEST_CLUSTER` is `1`, `true` or `yes` (any case).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when opted in, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("test database setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

/// A migrated database, a repository on it and the runtime that drives it.
///
/// Tests are synchronous and call `runtime.block_on`; the embedded cluster
/// runs its own runtime and must not be bootstrapped from inside another.
pub struct TestStore {
    pub repository: DieselUserRepository,
    pub runtime: Runtime,
}

fn database_url() -> Result<String, String> {
    if let Ok(url) = std::env::var("TEST_DATABASE_URL") {
        if !url.trim().is_empty() {
            return Ok(url);
        }
    }

    let cluster = pg_embedded_setup_unpriv::test_support::shared_cluster_handle()
        .map_err(|err| format!("embedded cluster: {err:?}"))?;
    let name = format!("users_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database(name.as_str())
        .map_err(|err| format!("create database {name}: {err:?}"))?;
    Ok(cluster.connection().database_url(&name))
}

impl TestStore {
    /// Provision a database, apply migrations and build a small pool.
    pub fn provision() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let url = database_url()?;

        {
            let _guard = MIGRATION_LOCK
                .get_or_init(|| Mutex::new(()))
                .lock()
                .unwrap_or_else(|err| err.into_inner());
            runtime
                .block_on(run_pending_migrations(&url))
                .map_err(|err| err.to_string())?;
        }

        let config = PoolConfig {
            max_size: 2,
            ..PoolConfig::new(url)
        };
        let pool = runtime
            .block_on(DbPool::connect(&config))
            .map_err(|err| err.to_string())?;

        Ok(Self {
            repository: DieselUserRepository::new(pool, Duration::from_secs(5)),
            runtime,
        })
    }
}
