//! Domain types, ports and the user service.
//!
//! Public surface:
//! - [`User`] and [`UserId`]: the stored record and its key.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`TraceId`]: request correlation identifier.
//! - [`UserServiceImpl`]: the use-case layer over a [`ports::UserRepository`].

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::TraceId;
pub use self::user::{User, UserId, UserIdError};
pub use self::user_service::UserServiceImpl;
