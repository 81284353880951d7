use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use taskkeep_core::error::{AuthFailure, CoreError};
use taskkeep_db::StoreError;

use crate::response::{ErrorBody, FieldError, INTERNAL_ERROR_CODE, INTERNAL_ERROR_MESSAGE};

/// Internal diagnostic attached to 500 responses as a response extension.
///
/// Never serialized by [`AppError`] itself; [`crate::middleware::error_detail`]
/// copies it into the body when the server is not in production mode.
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce the `{success:false, ...}` envelope.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `taskkeep_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A persistence failure from a store implementation.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message (e.g. malformed JSON).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Field-level validation failures.
    #[error("Validation failed")]
    InvalidInput(Vec<FieldError>),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<AuthFailure> for AppError {
    fn from(failure: AuthFailure) -> Self {
        AppError::Core(CoreError::Unauthorized(failure))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<FieldError> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| FieldError {
                    field: field.to_string(),
                    message: e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("{field} is invalid")),
                })
            })
            .collect();
        fields.sort_by(|a, b| a.field.cmp(&b.field));
        AppError::InvalidInput(fields)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut errors = Vec::new();
        let mut detail = None;

        let (status, code, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, .. } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                CoreError::DuplicateEmail => (
                    StatusCode::BAD_REQUEST,
                    "DUPLICATE_EMAIL",
                    CoreError::DuplicateEmail.to_string(),
                ),
                CoreError::InvalidCredentials => (
                    StatusCode::BAD_REQUEST,
                    "INVALID_CREDENTIALS",
                    CoreError::InvalidCredentials.to_string(),
                ),
                CoreError::Unauthorized(failure) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", failure.to_string())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    detail = Some(msg);
                    internal()
                }
            },

            // --- Store errors ---
            AppError::Store(StoreError::UniqueViolation { constraint }) => (
                StatusCode::CONFLICT,
                "CONFLICT",
                format!("Duplicate value violates unique constraint: {constraint}"),
            ),
            AppError::Store(StoreError::Database(err)) => {
                tracing::error!(error = %err, "Database error");
                detail = Some(err.to_string());
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::InvalidInput(fields) => {
                errors = fields;
                (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    "Validation failed".to_string(),
                )
            }
            AppError::Timeout => (
                StatusCode::REQUEST_TIMEOUT,
                "REQUEST_TIMEOUT",
                "Request timed out".to_string(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                detail = Some(msg);
                internal()
            }
        };

        let body = ErrorBody {
            success: false,
            message,
            errors,
            code,
            detail: None,
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(detail) = detail {
            response.extensions_mut().insert(ErrorDetail(detail));
        }
        response
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        INTERNAL_ERROR_CODE,
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}
