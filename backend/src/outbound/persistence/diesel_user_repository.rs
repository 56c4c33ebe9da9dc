//! PostgreSQL-backed [`UserRepository`] using Diesel.
//!
//! Each call checks out one pooled connection and runs a single statement
//! under the configured store deadline. Engine failures are translated into
//! [`UserPersistenceError`] here so nothing above this layer sees Diesel types.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel_async::pooled_connection::bb8::PooledConnection;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};

use super::models::{NewUserRow, UserChangeset, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
    store_timeout: Duration,
}

impl DieselUserRepository {
    /// Create a repository that abandons any statement running longer than
    /// `store_timeout`.
    pub fn new(pool: DbPool, store_timeout: Duration) -> Self {
        Self {
            pool,
            store_timeout,
        }
    }

    /// Check a connection out; waiting on an exhausted or unreachable pool is a
    /// connection failure.
    async fn checkout(
        &self,
    ) -> Result<PooledConnection<'_, AsyncPgConnection>, UserPersistenceError> {
        self.pool.connections().get().await.map_err(|err| {
            debug!(error = %err, "user store checkout failed");
            UserPersistenceError::connection(err.to_string())
        })
    }
}

/// Translate a Diesel failure. `email` names the row being written so a
/// unique violation can report it; reads pass `None`.
fn map_diesel_error(error: DieselError, email: Option<&str>) -> UserPersistenceError {
    match &error {
        DieselError::DatabaseError(kind, info) => debug!(
            ?kind,
            message = info.message(),
            constraint = info.constraint_name(),
            "diesel operation failed"
        ),
        other => debug!(error = %other, "diesel operation failed"),
    }

    match (error, email) {
        (DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _), Some(email)) => {
            UserPersistenceError::already_exists(email)
        }
        (
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                _,
            ),
            _,
        ) => UserPersistenceError::connection("database connection error"),
        (DieselError::QueryBuilderError(_), _) => {
            UserPersistenceError::query("database query error")
        }
        _ => UserPersistenceError::query("database error"),
    }
}

/// Run `operation`, failing with a connection error once `deadline` passes.
async fn within_deadline<T, F>(deadline: Duration, operation: F) -> Result<T, UserPersistenceError>
where
    F: Future<Output = Result<T, UserPersistenceError>>,
{
    tokio::time::timeout(deadline, operation)
        .await
        .unwrap_or_else(|_| {
            debug!(deadline_ms = deadline.as_millis(), "user store deadline elapsed");
            Err(UserPersistenceError::connection("store operation timed out"))
        })
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn get_by_id(&self, id: &UserId) -> Result<User, UserPersistenceError> {
        within_deadline(self.store_timeout, async {
            let mut conn = self.checkout().await?;

            let row: Option<UserRow> = users::table
                .find(*id.as_uuid())
                .select(UserRow::as_select())
                .first(&mut conn)
                .await
                .optional()
                .map_err(|err| map_diesel_error(err, None))?;

            row.map(User::from)
                .ok_or_else(|| UserPersistenceError::not_found(*id))
        })
        .await
    }

    async fn create(&self, user: &User) -> Result<(), UserPersistenceError> {
        within_deadline(self.store_timeout, async {
            let mut conn = self.checkout().await?;

            diesel::insert_into(users::table)
                .values(NewUserRow::from(user))
                .execute(&mut conn)
                .await
                .map(|_| ())
                .map_err(|err| map_diesel_error(err, Some(user.email())))
        })
        .await
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        within_deadline(self.store_timeout, async {
            let mut conn = self.checkout().await?;

            let updated = diesel::update(users::table.find(*user.id().as_uuid()))
                .set(&UserChangeset::from(user))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, Some(user.email())))?;

            if updated == 0 {
                return Err(UserPersistenceError::not_found(*user.id()));
            }
            Ok(())
        })
        .await
    }

    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError> {
        within_deadline(self.store_timeout, async {
            let mut conn = self.checkout().await?;

            let deleted = diesel::delete(users::table.find(*id.as_uuid()))
                .execute(&mut conn)
                .await
                .map_err(|err| map_diesel_error(err, None))?;

            if deleted == 0 {
                return Err(UserPersistenceError::not_found(*id));
            }
            Ok(())
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outbound::persistence::PoolConfig;
    use rstest::rstest;

    fn database_error(kind: DatabaseErrorKind) -> DieselError {
        DieselError::DatabaseError(kind, Box::new("engine message".to_owned()))
    }

    #[rstest]
    fn unique_violation_on_write_names_email() {
        let err = map_diesel_error(
            database_error(DatabaseErrorKind::UniqueViolation),
            Some("a@x"),
        );
        assert_eq!(err, UserPersistenceError::already_exists("a@x"));
        assert_eq!(err.to_string(), "user with email a@x already exists");
    }

    #[rstest]
    fn unique_violation_without_email_is_query_error() {
        let err = map_diesel_error(database_error(DatabaseErrorKind::UniqueViolation), None);
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }

    #[rstest]
    #[case(DatabaseErrorKind::ClosedConnection)]
    #[case(DatabaseErrorKind::UnableToSendCommand)]
    fn lost_connection_maps_to_connection(#[case] kind: DatabaseErrorKind) {
        let err = map_diesel_error(database_error(kind), Some("a@x"));
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
    }

    #[rstest]
    #[case(DieselError::NotFound)]
    #[case(database_error(DatabaseErrorKind::ForeignKeyViolation))]
    #[case(DieselError::RollbackTransaction)]
    fn everything_else_is_query_error(#[case] error: DieselError) {
        let err = map_diesel_error(error, None);
        assert_eq!(err, UserPersistenceError::query("database error"));
    }

    #[tokio::test]
    async fn unreachable_store_is_connection_error() {
        let config = PoolConfig {
            min_idle: None,
            connection_timeout: Duration::from_millis(200),
            ..PoolConfig::new("postgres://127.0.0.1:1/unreachable")
        };
        let pool = DbPool::connect(&config).await.expect("lazy pool builds");
        let repository = DieselUserRepository::new(pool, Duration::from_secs(5));

        let err = repository
            .get_by_id(&UserId::from_uuid(uuid::Uuid::nil()))
            .await
            .expect_err("nothing listens on port 1");
        assert!(matches!(err, UserPersistenceError::Connection { .. }));
    }

    #[tokio::test]
    async fn deadline_elapsing_is_connection_error() {
        let result: Result<(), _> =
            within_deadline(Duration::from_millis(5), std::future::pending()).await;
        assert_eq!(
            result,
            Err(UserPersistenceError::connection("store operation timed out"))
        );
    }

    #[tokio::test]
    async fn operation_result_passes_through() {
        let result = within_deadline(Duration::from_secs(1), async { Ok(7_u8) }).await;
        assert_eq!(result, Ok(7));
    }
}
