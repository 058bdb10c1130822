use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use onekaday_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Internal(String),
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub(crate) code: u16,
    pub(crate) message: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

fn internal(detail: &dyn std::fmt::Display) -> (StatusCode, String) {
    tracing::error!("Request failed: {}", detail);
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string())
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                CoreError::NotFound(what) | CoreError::Forbidden(what) => {
                    // Another user's record must be indistinguishable from a missing one
                    (StatusCode::NOT_FOUND, format!("{what} not found"))
                }
                CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, "Record not found".to_string())
                }
                CoreError::DuplicateUsername(_) | CoreError::DuplicateEmail(_) => {
                    (StatusCode::CONFLICT, e.to_string())
                }
                CoreError::InvalidCredentials => (StatusCode::UNAUTHORIZED, e.to_string()),
                CoreError::Database(_) | CoreError::PasswordHash(_) | CoreError::Unexpected(_) => {
                    internal(e)
                }
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            ApiError::Internal(reason) => internal(reason),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

impl From<onekaday_core::errors::ValidationError> for ApiError {
    fn from(err: onekaday_core::errors::ValidationError) -> Self {
        ApiError::Core(CoreError::Validation(err))
    }
}

/// Malformed or mistyped request bodies.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => ApiError::Unauthorized("Unauthorized".to_string()),
            AuthError::Internal(reason) => ApiError::Internal(reason),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
