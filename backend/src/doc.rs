//! OpenAPI document for the users API.
//!
//! Paths are documented under the default `/api` prefix. Swagger UI serves
//! this document in debug builds and `openapi-dump` prints it for tooling.

use utoipa::OpenApi;

use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::schemas::UserSchema;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users service API",
        description = "Create, read, update and delete user accounts."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(UserSchema, ErrorBody)),
    tags(
        (name = "users", description = "User account operations"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn users_path_has_all_four_methods() {
        let doc = ApiDoc::openapi();
        let item = doc.paths.paths.get("/api/users").expect("users path");
        assert!(item.get.is_some());
        assert!(item.post.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }

    #[rstest]
    #[case("User")]
    #[case("ErrorBody")]
    fn schemas_are_registered(#[case] name: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        assert!(schemas.contains_key(name), "missing schema {name}");
    }
}
