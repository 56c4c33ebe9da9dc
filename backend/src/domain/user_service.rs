//! [`UserService`] backed by a [`UserRepository`].
//!
//! The service holds no rules of its own beyond translating storage failures
//! into domain [`Error`] categories.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::ports::{UserPersistenceError, UserRepository, UserService};
use super::{Error, User, UserId};

/// Default user service.
#[derive(Clone)]
pub struct UserServiceImpl {
    repository: Arc<dyn UserRepository>,
}

impl UserServiceImpl {
    /// Wrap a storage adapter.
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }
}

impl From<UserPersistenceError> for Error {
    fn from(error: UserPersistenceError) -> Self {
        debug!(kind = error.kind(), %error, "user repository call failed");
        let message = error.to_string();
        match error {
            UserPersistenceError::NotFound { .. } => Self::not_found(message),
            UserPersistenceError::AlreadyExists { .. } => Self::conflict(message),
            UserPersistenceError::Connection { .. } => Self::service_unavailable(message),
            UserPersistenceError::Query { .. } => Self::internal(message),
        }
    }
}

#[async_trait]
impl UserService for UserServiceImpl {
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, Error> {
        self.repository.get_by_id(id).await.map_err(Error::from)
    }

    async fn create_user(&self, user: &User) -> Result<(), Error> {
        self.repository.create(user).await.map_err(Error::from)
    }

    async fn update_user(&self, user: &User) -> Result<(), Error> {
        self.repository.update(user).await.map_err(Error::from)
    }

    async fn delete_user(&self, id: &UserId) -> Result<(), Error> {
        self.repository.delete(id).await.map_err(Error::from)
    }
}
