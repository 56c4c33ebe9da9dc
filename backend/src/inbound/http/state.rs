//! Shared HTTP adapter state.
//!
//! Handlers receive this through `web::Data` and depend only on the
//! [`UserService`] port, so tests can substitute a mock.

use std::sync::Arc;

use crate::domain::ports::UserService;

/// Dependencies for the user handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User use-cases behind the handlers.
    pub users: Arc<dyn UserService>,
}

impl HttpState {
    /// Bundle the handler dependencies.
    pub fn new(users: Arc<dyn UserService>) -> Self {
        Self { users }
    }
}
