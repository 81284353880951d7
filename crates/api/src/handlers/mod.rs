pub mod auth;
pub mod profile;
pub mod tasks;

use axum::http::Uri;

use taskkeep_core::error::CoreError;

use crate::error::AppError;

/// Fallback for unmatched paths, rendered in the standard error envelope.
pub async fn not_found(uri: Uri) -> AppError {
    CoreError::not_found("Route", uri.path()).into()
}
