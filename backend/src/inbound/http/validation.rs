//! Request validation helpers for the HTTP adapter.

use crate::domain::{Error, UserId, UserIdError};

use super::error::ApiError;

/// Parse the `id` query parameter.
///
/// Absent and empty values both yield `"id is empty"`; anything that is not
/// a UUID yields `"invalid user id: <raw>"`.
pub(crate) fn parse_user_id(raw: Option<&str>) -> Result<UserId, ApiError> {
    UserId::parse(raw.unwrap_or_default()).map_err(|err| {
        let message = err.to_string();
        let source = match &err {
            UserIdError::Empty => Error::invalid_request("missing id query parameter"),
            UserIdError::Invalid { .. } => Error::invalid_request(message.clone()),
        };
        ApiError::invalid_input(message, source)
    })
}
