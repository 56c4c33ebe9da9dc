//! Diesel table definitions.
//!
//! Kept in step with `migrations/` by hand.

diesel::table! {
    /// Registered users. `email` carries the `users_email_key` unique constraint.
    users (id) {
        /// Client-supplied identifier.
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        age -> Int4,
        /// Exact decimal balance.
        balance -> Numeric,
    }
}
