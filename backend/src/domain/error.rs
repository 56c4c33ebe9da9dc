//! Domain-level error type.
//!
//! Errors here know nothing about HTTP. The inbound adapter decides which
//! status code and public message each [`ErrorCode`] becomes.

use std::fmt;

use serde::Serialize;

use super::TraceId;

/// Failure category shared by every adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The caller sent something malformed.
    InvalidRequest,
    /// The addressed user does not exist.
    NotFound,
    /// The write collides with existing data.
    Conflict,
    /// The backing store is unreachable or timed out.
    ServiceUnavailable,
    /// Anything else.
    InternalError,
}

/// Domain error with a category, a diagnostic message and the trace id of
/// the request that produced it.
///
/// # Examples
/// ```
/// use users_service::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("user 42 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert!(err.trace_id().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<TraceId>,
}

impl Error {
    /// Build an error, capturing the trace id in scope.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            trace_id: TraceId::current(),
        }
    }

    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Diagnostic message. Not meant for clients verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Trace id captured at construction time.
    #[must_use]
    pub const fn trace_id(&self) -> Option<TraceId> {
        self.trace_id
    }

    /// Shorthand for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Shorthand for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Shorthand for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// Shorthand for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Shorthand for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}
