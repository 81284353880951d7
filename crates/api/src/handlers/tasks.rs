//! Handlers for the `/tasks` resource.
//!
//! All endpoints require authentication via [`AuthUser`]. Every task is
//! visible only to the user who created it; see [`crate::guard`].

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use taskkeep_core::error::CoreError;
use taskkeep_db::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::{trimmed, trimmed_opt, QueryParams, ValidatedJson};
use crate::guard::find_and_authorize;
use crate::middleware::auth::AuthUser;
use crate::query::TaskListParams;
use crate::response::{MessageBody, Success};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /tasks`. The owner always comes from the token.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,

    #[serde(default, deserialize_with = "trimmed_opt")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

/// Request body for `PUT /tasks/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[serde(default, deserialize_with = "trimmed_opt")]
    #[validate(length(min = 1, message = "Title cannot be empty"))]
    pub title: Option<String>,

    #[serde(default, deserialize_with = "trimmed_opt")]
    pub description: Option<String>,

    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskBody {
    pub task: Task,
}

#[derive(Debug, Serialize)]
pub struct TaskListBody {
    pub tasks: Vec<Task>,
}

/// Parse an optional status, treating an empty string as absent.
pub(crate) fn parse_status(raw: Option<&str>) -> Result<Option<TaskStatus>, CoreError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse::<TaskStatus>()
            .map(Some)
            .map_err(|e| CoreError::Validation(e.to_string())),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/tasks
pub async fn create_task(
    auth: AuthUser,
    State(state): State<AppState>,
    ValidatedJson(input): ValidatedJson<CreateTaskRequest>,
) -> AppResult<Json<Success<TaskBody>>> {
    let create = CreateTask {
        title: input.title,
        description: input.description,
        status: parse_status(input.status.as_deref())?.unwrap_or_default(),
    };
    let task = state.tasks.create_task(auth.user_id, &create).await?;

    tracing::info!(task_id = task.id, user_id = auth.user_id, "Task created");

    Ok(Json(Success::new(TaskBody { task })))
}

/// GET /api/tasks?status=&search=
///
/// Only the caller's tasks, newest first.
pub async fn list_tasks(
    auth: AuthUser,
    State(state): State<AppState>,
    QueryParams(params): QueryParams<TaskListParams>,
) -> AppResult<Json<Success<TaskListBody>>> {
    let filter = params.into_filter()?;
    let tasks = state.tasks.list_tasks(auth.user_id, &filter).await?;

    Ok(Json(Success::new(TaskListBody { tasks })))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Success<TaskBody>>> {
    let task = find_and_authorize(state.tasks.as_ref(), &id, &auth).await?;
    Ok(Json(Success::new(TaskBody { task })))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(input): ValidatedJson<UpdateTaskRequest>,
) -> AppResult<Json<Success<TaskBody>>> {
    let patch = UpdateTask {
        title: input.title,
        description: input.description,
        status: parse_status(input.status.as_deref())?,
    };

    let existing = find_and_authorize(state.tasks.as_ref(), &id, &auth).await?;

    // Deleted between the load and the write.
    let task = state
        .tasks
        .update_task(existing.id, auth.user_id, &patch)
        .await?
        .ok_or_else(|| CoreError::not_found("Task", existing.id))?;

    tracing::info!(task_id = task.id, user_id = auth.user_id, "Task updated");

    Ok(Json(Success::new(TaskBody { task })))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<Success<MessageBody>>> {
    let existing = find_and_authorize(state.tasks.as_ref(), &id, &auth).await?;

    if !state.tasks.delete_task(existing.id, auth.user_id).await? {
        return Err(CoreError::not_found("Task", existing.id).into());
    }

    tracing::info!(task_id = existing.id, user_id = auth.user_id, "Task deleted");

    Ok(Json(Success::new(MessageBody {
        message: "Task removed",
    })))
}
