//! HTTP inbound adapter.

pub mod error;
pub mod health;
pub mod schemas;
pub mod state;
pub mod users;
mod validation;

pub use error::{ApiError, ApiResult};

use actix_web::{Scope, web};

/// Mount the user handlers under `prefix` with the 400-mapping extractor
/// configs installed.
///
/// A trailing `/` on `prefix` is ignored.
#[must_use]
pub fn api_scope(prefix: &str) -> Scope {
    web::scope(prefix.trim_end_matches('/'))
        .app_data(error::json_config())
        .app_data(error::query_config())
        .service(users::get_user)
        .service(users::create_user)
        .service(users::update_user)
        .service(users::delete_user)
}
