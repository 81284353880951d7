//! Handlers for the caller's own profile.

use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use taskkeep_core::error::CoreError;
use taskkeep_db::models::user::{UpdateUser, UserResponse};
use validator::Validate;

use crate::auth::credentials::normalize_email;
use crate::error::AppResult;
use crate::extract::{trimmed, ValidatedJson};
use crate::handlers::auth::UserBody;
use crate::middleware::auth::AuthUser;
use crate::response::Success;
use crate::state::AppState;

/// Request body for `PUT /profile`.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,
}

/// GET /api/profile, GET /api/profile/me
pub async fn get_profile(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Success<UserBody>>> {
    let user = state
        .users
        .find_user_by_id(auth.user_id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", auth.user_id))?;

    Ok(Json(Success::new(UserBody {
        user: UserResponse::from(&user),
    })))
}

/// PUT /api/profile
///
/// Changing to an email held by another account is rejected as a duplicate.
pub async fn update_profile(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<UpdateProfileRequest>,
) -> AppResult<Json<Success<UserBody>>> {
    let email = normalize_email(&input.email);

    if let Some(holder) = state.users.find_user_by_email(&email).await? {
        if holder.id != auth.user_id {
            return Err(CoreError::DuplicateEmail.into());
        }
    }

    let update = UpdateUser {
        name: Some(input.name),
        email: Some(email),
    };
    let user = match state.users.update_user(auth.user_id, &update).await {
        Ok(user) => user.ok_or_else(|| CoreError::not_found("User", auth.user_id))?,
        Err(e) if e.is_duplicate_email() => return Err(CoreError::DuplicateEmail.into()),
        Err(e) => return Err(e.into()),
    };

    tracing::info!(user_id = user.id, "Profile updated");

    Ok(Json(Success::new(UserBody {
        user: UserResponse::from(&user),
    })))
}
