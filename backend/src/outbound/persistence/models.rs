//! Diesel row structs for the `users` table.
//!
//! These never leave the persistence layer; conversions to and from
//! [`User`] live here.

use bigdecimal::BigDecimal;
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{User, UserId};

use super::schema::users;

/// Row read back from `users`.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub age: i32,
    pub balance: BigDecimal,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self::new(
            UserId::from_uuid(row.id),
            row.name,
            row.email,
            row.age,
            row.balance,
        )
    }
}

/// Values for `INSERT INTO users`.
#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub age: i32,
    pub balance: &'a BigDecimal,
}

impl<'a> From<&'a User> for NewUserRow<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            id: *user.id().as_uuid(),
            name: user.name(),
            email: user.email(),
            age: user.age(),
            balance: user.balance(),
        }
    }
}

/// Every mutable column; the primary key is matched, never written.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserChangeset<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub age: i32,
    pub balance: &'a BigDecimal,
}

impl<'a> From<&'a User> for UserChangeset<'a> {
    fn from(user: &'a User) -> Self {
        Self {
            name: user.name(),
            email: user.email(),
            age: user.age(),
            balance: user.balance(),
        }
    }
}
