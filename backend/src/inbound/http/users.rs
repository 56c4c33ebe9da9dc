//! User CRUD handlers.
//!
//! ```text
//! GET    /api/users?id=<uuid>
//! POST   /api/users            {"id","name","email","age","balance"}
//! PUT    /api/users            {"id","name","email","age","balance"}
//! DELETE /api/users?id=<uuid>
//! ```
//!
//! The paths are relative to the configured API prefix.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::domain::User;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{ApiError, ErrorBody, UserOperation, json_response};
use crate::inbound::http::schemas::UserSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_user_id;

/// Query string addressing one user.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserIdQuery {
    /// Identifier of the user.
    pub id: Option<String>,
}

/// Fetch a user by id.
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserIdQuery),
    responses(
        (status = 200, description = "The user", body = UserSchema),
        (status = 400, description = "Missing or malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users")]
pub async fn get_user(
    state: web::Data<HttpState>,
    query: web::Query<UserIdQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(query.id.as_deref())?;
    let user = state
        .users
        .get_user_by_id(&id)
        .await
        .map_err(|err| ApiError::for_operation(UserOperation::Get, err))?;
    Ok(json_response(StatusCode::OK, &user))
}

/// Register a new user; the body is echoed back on success.
#[utoipa::path(
    post,
    path = "/api/users",
    request_body = UserSchema,
    responses(
        (status = 201, description = "User created", body = UserSchema),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<User>,
) -> ApiResult<HttpResponse> {
    let user = payload.into_inner();
    state
        .users
        .create_user(&user)
        .await
        .map_err(|err| ApiError::for_operation(UserOperation::Create, err))?;
    Ok(json_response(StatusCode::CREATED, &user))
}

/// Overwrite every field of an existing user.
#[utoipa::path(
    put,
    path = "/api/users",
    request_body = UserSchema,
    responses(
        (status = 200, description = "User updated", body = String, example = json!("user updated")),
        (status = 400, description = "Malformed body", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users")]
pub async fn update_user(
    state: web::Data<HttpState>,
    payload: web::Json<User>,
) -> ApiResult<HttpResponse> {
    let user = payload.into_inner();
    state
        .users
        .update_user(&user)
        .await
        .map_err(|err| ApiError::for_operation(UserOperation::Update, err))?;
    Ok(json_response(StatusCode::OK, &"user updated"))
}

/// Remove a user by id.
#[utoipa::path(
    delete,
    path = "/api/users",
    params(UserIdQuery),
    responses(
        (status = 200, description = "User deleted", body = String, example = json!("user deleted")),
        (status = 400, description = "Missing or malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    query: web::Query<UserIdQuery>,
) -> ApiResult<HttpResponse> {
    let id = parse_user_id(query.id.as_deref())?;
    state
        .users
        .delete_user(&id)
        .await
        .map_err(|err| ApiError::for_operation(UserOperation::Delete, err))?;
    Ok(json_response(StatusCode::OK, &"user deleted"))
}
