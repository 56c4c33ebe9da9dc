//! HTTP rendering of failures.
//!
//! Handlers never expose domain messages directly. Each operation maps the
//! [`ErrorCode`]s it expects to a status and a fixed public message; anything
//! else becomes a 500 with the operation's fallback text. The domain error is
//! kept as the source and logged when the response is rendered.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::http::StatusCode;
use actix_web::http::header::{self, HeaderValue};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode};

/// Handler result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Client-facing description.
    #[schema(example = "user not found")]
    pub message: String,
}

/// The four user operations, each with its own failure vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserOperation {
    /// `GET /users`.
    Get,
    /// `POST /users`.
    Create,
    /// `PUT /users`.
    Update,
    /// `DELETE /users`.
    Delete,
}

impl UserOperation {
    const fn fallback_message(self) -> &'static str {
        match self {
            Self::Get => "failed to get user",
            Self::Create => "failed to create user",
            Self::Update => "failed to update user",
            Self::Delete => "failed to delete user",
        }
    }
}

/// A failure ready to be written as `{"message": ...}` with a status code.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    status: StatusCode,
    message: String,
    #[source]
    source: Error,
}

impl ApiError {
    /// 400 for input that never reached the service.
    pub fn invalid_input(message: impl Into<String>, source: Error) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
            source,
        }
    }

    /// Map a service failure for `operation` to its status and public message.
    #[must_use]
    pub fn for_operation(operation: UserOperation, source: Error) -> Self {
        let (status, message) = match (operation, source.code()) {
            (_, ErrorCode::InvalidRequest) => {
                (StatusCode::BAD_REQUEST, source.message().to_owned())
            }
            (
                UserOperation::Get | UserOperation::Update | UserOperation::Delete,
                ErrorCode::NotFound,
            ) => (StatusCode::NOT_FOUND, "user not found".to_owned()),
            (UserOperation::Create, ErrorCode::Conflict) => {
                (StatusCode::CONFLICT, source.message().to_owned())
            }
            _ => (
                StatusCode::INTERNAL_SERVER_ERROR,
                operation.fallback_message().to_owned(),
            ),
        };
        Self {
            status,
            message,
            source,
        }
    }

    /// Response status.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Client-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The domain error behind this response.
    #[must_use]
    pub fn source_error(&self) -> &Error {
        &self.source
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let trace_id = self
            .source
            .trace_id()
            .map(|id| id.to_string())
            .unwrap_or_default();
        error!(
            status = self.status.as_u16(),
            code = ?self.source.code(),
            error = %self.source,
            trace_id = %trace_id,
            "api error: {}",
            self.message
        );
        json_response(
            self.status,
            &ErrorBody {
                message: self.message.clone(),
            },
        )
    }
}

/// Serialise `body` as the JSON response.
///
/// If encoding fails the client gets a plain-text 500 describing the
/// encoder failure instead.
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> HttpResponse {
    match serde_json::to_vec(body) {
        Ok(bytes) => HttpResponse::build(status)
            .insert_header((
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            ))
            .body(bytes),
        Err(err) => {
            error!(error = %err, "failed to encode response body");
            HttpResponse::InternalServerError()
                .insert_header((header::CONTENT_TYPE, HeaderValue::from_static("text/plain")))
                .body(err.to_string())
        }
    }
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::invalid_input(
        "failed to decode request body",
        Error::invalid_request(err.to_string()),
    )
    .into()
}

fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::invalid_input(
        "invalid query string",
        Error::invalid_request(err.to_string()),
    )
    .into()
}

/// JSON extractor settings rendering decode failures as 400 `ApiError`s.
#[must_use]
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// Query extractor settings rendering parse failures as 400 `ApiError`s.
#[must_use]
pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(query_error_handler)
}
