pub mod auth;
pub mod health;
pub mod profile;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                 register (public)
/// /auth/login                    login (public)
/// /auth/user                     current user (requires auth)
///
/// /profile                       get, update own profile
/// /profile/me                    get own profile
///
/// /tasks                         list (?status=&search=), create
/// /tasks/{id}                    get, update, delete (owner only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/profile", profile::router())
        .nest("/tasks", tasks::router())
}
