//! OpenAPI schema for the domain [`User`](crate::domain::User).
//!
//! The domain type stays free of utoipa; this mirror lives in the adapter.

use utoipa::ToSchema;

/// A user account as exchanged over HTTP.
#[derive(ToSchema)]
#[schema(as = User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Client-chosen identifier.
    #[schema(value_type = String, format = Uuid, example = "7f1c2d4e-0000-4000-8000-000000000001")]
    id: String,
    #[schema(example = "Ada")]
    name: String,
    /// Unique across all users.
    #[schema(example = "ada@example.com")]
    email: String,
    #[schema(example = 36)]
    age: i32,
    /// Exact decimal, encoded as a string.
    #[schema(value_type = String, example = "10.50")]
    balance: String,
}
