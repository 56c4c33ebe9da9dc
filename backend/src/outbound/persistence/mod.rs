//! PostgreSQL persistence via Diesel and `diesel-async`.
//!
//! Row structs (`models.rs`) and the table definition (`schema.rs`) stay
//! private to this module. Callers see [`DieselUserRepository`], the pool
//! types and the migration entry point.
//!
//! ```ignore
//! use users_service::outbound::persistence::{DbPool, DieselUserRepository, PoolConfig};
//!
//! let pool = DbPool::connect(&PoolConfig::new("postgres://localhost/users")).await?;
//! let repository = DieselUserRepository::new(pool, Duration::from_secs(5));
//! ```

mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
