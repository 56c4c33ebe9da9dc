//! Ports at the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod user_repository;
mod user_service;

#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use user_service::MockUserService;
pub use user_service::UserService;
