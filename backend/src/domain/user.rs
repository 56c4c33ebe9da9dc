//! User account record and its identifier.

use std::fmt;

use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reasons a raw string cannot become a [`UserId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserIdError {
    /// The identifier was absent or blank.
    #[error("id is empty")]
    Empty,
    /// The identifier is not a canonical UUID.
    #[error("invalid user id: {raw}")]
    Invalid {
        /// Offending input, kept for the error message.
        raw: String,
    },
}

/// Stable user identifier.
///
/// Serialised as the hyphenated UUID string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid);

impl UserId {
    /// Parse an identifier from its textual form.
    ///
    /// # Errors
    /// [`UserIdError::Empty`] for blank input and [`UserIdError::Invalid`]
    /// when the text is not a UUID.
    pub fn parse(raw: &str) -> Result<Self, UserIdError> {
        if raw.trim().is_empty() {
            return Err(UserIdError::Empty);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| UserIdError::Invalid {
                raw: raw.to_owned(),
            })
    }

    /// Wrap a UUID that is already known to be valid.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Borrow the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for UserId {
    type Error = UserIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

/// A user account.
///
/// The JSON form is `{"id", "name", "email", "age", "balance"}`; every field
/// is required when decoding. `balance` is an exact decimal and is written as
/// a string (`"10.50"`) so no precision is lost in transit. Numeric JSON
/// input is accepted too and is read from the literal text, never through a
/// binary float.
///
/// # Examples
/// ```
/// use users_service::domain::User;
///
/// let user: User = serde_json::from_str(
///     r#"{"id":"7f1c2d4e-0000-4000-8000-000000000001","name":"A",
///         "email":"a@x","age":30,"balance":"10.50"}"#,
/// )
/// .expect("valid user");
/// assert_eq!(user.email(), "a@x");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    age: i32,
    balance: BigDecimal,
}

impl User {
    /// Assemble a user from its parts.
    #[must_use]
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        age: i32,
        balance: BigDecimal,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            age,
            balance,
        }
    }

    /// Primary key.
    #[must_use]
    pub const fn id(&self) -> &UserId {
        &self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Email address; unique across all users.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Age in years.
    #[must_use]
    pub const fn age(&self) -> i32 {
        self.age
    }

    /// Account balance as an exact decimal.
    #[must_use]
    pub const fn balance(&self) -> &BigDecimal {
        &self.balance
    }
}
