//! Handlers for the `/auth` resource (register, login, current user).

use std::fmt;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use taskkeep_core::error::CoreError;
use taskkeep_db::models::user::{User, UserResponse, UserSummary};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::extract::{trimmed, ValidatedJson};
use crate::middleware::auth::AuthUser;
use crate::response::Success;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/register`.
#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 6, message = "Please enter a password with 6 or more characters"))]
    pub password: String,
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Request body for `POST /auth/login`.
#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "Please include a valid email"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Returned by register and login.
#[derive(Debug, Serialize)]
pub struct AuthBody {
    pub token: String,
    pub user: UserSummary,
}

#[derive(Debug, Serialize)]
pub struct UserBody {
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<RegisterRequest>,
) -> AppResult<Json<Success<AuthBody>>> {
    let user = state
        .credentials
        .register(&input.name, &input.email, &input.password)
        .await?;

    tracing::info!(user_id = user.id, "User registered");

    Ok(Json(Success::new(auth_body(&state, &user)?)))
}

/// POST /api/auth/login
///
/// Unknown email and wrong password return the same 400.
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<LoginRequest>,
) -> AppResult<Json<Success<AuthBody>>> {
    let user = state
        .credentials
        .verify_login(&input.email, &input.password)
        .await?;

    tracing::info!(user_id = user.id, "User logged in");

    Ok(Json(Success::new(auth_body(&state, &user)?)))
}

/// GET /api/auth/user
pub async fn current_user(
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

fn auth_body(state: &AppState, user: &User) -> AppResult<AuthBody> {
    let issued = state
        .issuer
        .issue(user.id)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    Ok(AuthBody {
        token: issued.token,
        user: UserSummary::from(user),
    })
}
