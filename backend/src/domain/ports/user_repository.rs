//! Driven port for user storage.
use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures reported by user storage adapters.
    pub enum UserPersistenceError {
        /// No row exists for the identifier.
        NotFound { id: UserId } => "user {id} not found",
        /// Insert or update collided with a unique constraint.
        AlreadyExists { email: String } => "user with email {email} already exists",
        /// The store could not be reached or did not answer in time.
        Connection { message: String } => "user store connection failed: {message}",
        /// The store rejected or failed the statement.
        Query { message: String } => "user store query failed: {message}",
    }
}

/// Storage for [`User`] records keyed by [`UserId`].
///
/// Every call is atomic. Dropping the returned future abandons the
/// statement.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch the user with `id`.
    async fn get_by_id(&self, id: &UserId) -> Result<User, UserPersistenceError>;

    /// Insert `user`; fails with `AlreadyExists` if the email or id is taken.
    async fn create(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Overwrite the record whose id matches `user.id()`. Never inserts.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Remove the user with `id`.
    async fn delete(&self, id: &UserId) -> Result<(), UserPersistenceError>;
}
