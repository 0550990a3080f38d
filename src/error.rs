//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("customer not found: {0}")]
    NotFound(String),
    #[error("customer with email '{0}' already exists")]
    DuplicateEmail(String),
    #[error("validation: {0}")]
    Validation(String),
    /// Uniqueness or primary-key violation reported by the store itself.
    #[error("storage constraint violated: {0}")]
    StorageConstraintViolation(String),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

impl AppError {
    /// Stable machine-readable code placed in the error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "not_found",
            AppError::DuplicateEmail(_) | AppError::StorageConstraintViolation(_) => "duplicate_email",
            AppError::Validation(_) => "validation_error",
            AppError::BadRequest(_) => "bad_request",
            AppError::PayloadTooLarge(_) => "payload_too_large",
            AppError::Db(_) => "database_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail(_) | AppError::StorageConstraintViolation(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Db(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            // Store internals stay in the log, the caller sees the friendly duplicate message.
            AppError::StorageConstraintViolation(detail) => {
                tracing::warn!(detail = %detail, "store rejected write on uniqueness constraint");
                "customer with this email already exists".to_string()
            }
            AppError::Db(e) => {
                tracing::error!(error = %e, "database failure");
                "database error".to_string()
            }
            other => other.to_string(),
        };
        let body = ErrorBody {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_fallback_maps_like_duplicate() {
        let pre_check = AppError::DuplicateEmail("a@x.com".into());
        let race = AppError::StorageConstraintViolation("customers_email_key".into());
        assert_eq!(pre_check.status(), StatusCode::BAD_REQUEST);
        assert_eq!(race.status(), pre_check.status());
        assert_eq!(race.code(), pre_check.code());
    }

    #[test]
    fn status_mapping() {
        assert_eq!(AppError::NotFound("x".into()).status(), StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::Validation("first_name".into()).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            AppError::Db(sqlx::Error::PoolTimedOut).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
