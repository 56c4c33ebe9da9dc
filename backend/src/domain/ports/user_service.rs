//! Driving port consumed by the HTTP adapter.
use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// User management use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserService: Send + Sync {
    /// Look up a user.
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, Error>;

    /// Register a new user.
    async fn create_user(&self, user: &User) -> Result<(), Error>;

    /// Replace an existing user's fields.
    async fn update_user(&self, user: &User) -> Result<(), Error>;

    /// Remove a user.
    async fn delete_user(&self, id: &UserId) -> Result<(), Error>;
}
