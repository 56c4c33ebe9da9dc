//! Users service: a JSON-over-HTTP CRUD API for user accounts backed by
//! PostgreSQL.
//!
//! Layout follows ports and adapters: [`domain`] holds the types, ports and
//! service; [`inbound::http`] exposes them over Actix; [`outbound::persistence`]
//! stores them with Diesel.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
