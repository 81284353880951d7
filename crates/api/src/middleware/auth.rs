//! Token-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use taskkeep_core::error::AuthFailure;
use taskkeep_core::types::DbId;

use crate::error::AppError;
use crate::state::AppState;

/// Request header carrying the identity assertion.
pub const AUTH_TOKEN_HEADER: &str = "x-auth-token";

/// Verified caller identity, extracted from the `x-auth-token` header.
///
/// Use this as the first extractor of any handler that requires
/// authentication, so identity is resolved before the path, the body, or any
/// store access:
///
/// ```ignore
/// async fn my_handler(auth: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = auth.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTH_TOKEN_HEADER) {
            None => return Err(AuthFailure::MissingToken.into()),
            Some(value) => value
                .to_str()
                .map_err(|_| AuthFailure::InvalidSignature)?
                .trim(),
        };
        if token.is_empty() {
            return Err(AuthFailure::MissingToken.into());
        }

        let user_id = state.verifier.verify(token).map_err(|failure| {
            tracing::debug!(%failure, "Rejected auth token");
            failure
        })?;

        Ok(AuthUser { user_id })
    }
}
