//! Development-mode error detail.
//!
//! [`AppError`](crate::error::AppError) always renders sanitized 500 bodies and
//! stashes the underlying message in an [`ErrorDetail`] response extension.
//! Outside production this layer rewrites such responses to include it.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::ErrorDetail;
use crate::response::ErrorBody;
use crate::state::AppState;

pub async fn expose_error_detail(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    if state.config.app_env.is_production() {
        return response;
    }

    let detail = response
        .extensions()
        .get::<ErrorDetail>()
        .map(|ErrorDetail(detail)| detail.clone());

    match detail {
        Some(detail) => (response.status(), Json(ErrorBody::internal(Some(detail)))).into_response(),
        None => response,
    }
}
