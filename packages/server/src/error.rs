use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::storage::StorageError;
use sea_orm::DbErr;
use serde::Serialize;

use crate::repositories::RepositoryError;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`, `TOKEN_MISSING`,
    /// `TOKEN_INVALID`, `INVALID_CREDENTIALS`, `PERMISSION_DENIED`, `NOT_FOUND`,
    /// `USERNAME_TAKEN`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Name must be 1-256 characters")]
    pub message: String,
}

/// Application-level error type.
#[derive(Debug)]
pub enum AppError {
    Validation(String),
    TokenMissing,
    TokenInvalid,
    InvalidCredentials,
    PermissionDenied,
    NotFound(String),
    UsernameTaken,
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::TokenMissing => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_MISSING",
                    message: "Authentication required".into(),
                },
            ),
            AppError::TokenInvalid => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "TOKEN_INVALID",
                    message: "Invalid or expired token".into(),
                },
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody {
                    code: "INVALID_CREDENTIALS",
                    message: "Invalid username or password".into(),
                },
            ),
            AppError::PermissionDenied => (
                StatusCode::FORBIDDEN,
                ErrorBody {
                    code: "PERMISSION_DENIED",
                    message: "Only the owner can modify this terrain".into(),
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                ErrorBody {
                    code: "USERNAME_TAKEN",
                    message: "Username is already taken".into(),
                },
            ),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        AppError::Internal(format!("Object store: {err}"))
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Db(e) => e.into(),
            RepositoryError::Storage(e) => e.into(),
        }
    }
}
