//! Ownership guard for task-scoped operations.
//!
//! Existence is resolved before ownership: a missing (or unparsable) id is
//! `NotFound` for every caller, and only an existing task owned by someone
//! else is `Forbidden`.

use taskkeep_core::error::CoreError;
use taskkeep_core::ownership::ensure_owner;
use taskkeep_core::types::DbId;
use taskkeep_db::models::task::Task;
use taskkeep_db::TaskStore;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;

/// Parse a task id from the path. Anything that is not a positive integer
/// cannot name a task, so it is reported the same way as a missing one.
pub fn parse_task_id(raw: &str) -> AppResult<DbId> {
    raw.parse::<DbId>()
        .ok()
        .filter(|id| *id > 0)
        .ok_or_else(|| CoreError::not_found("Task", raw).into())
}

/// Load a task and verify the caller owns it.
///
/// Performs exactly one store read.
pub async fn find_and_authorize(
    tasks: &dyn TaskStore,
    raw_id: &str,
    auth: &AuthUser,
) -> AppResult<Task> {
    let id = parse_task_id(raw_id)?;

    let task = tasks
        .find_task_by_id(id)
        .await?
        .ok_or_else(|| CoreError::not_found("Task", id))?;

    if let Err(e) = ensure_owner(&task, auth.user_id) {
        tracing::warn!(task_id = id, user_id = auth.user_id, "Task access denied");
        return Err(e.into());
    }

    Ok(task)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use taskkeep_db::models::task::{CreateTask, TaskStatus};
    use taskkeep_db::MemoryStore;

    use super::*;
    use crate::error::AppError;

    async fn store_with_task(owner_id: DbId) -> (MemoryStore, Task) {
        let store = MemoryStore::new();
        let input = CreateTask {
            title: "Buy milk".into(),
            description: None,
            status: TaskStatus::Pending,
        };
        let task = store.create_task(owner_id, &input).await.unwrap();
        (store, task)
    }

    #[test]
    fn only_positive_integers_are_task_ids() {
        assert_eq!(parse_task_id("17").unwrap(), 17);
        for raw in ["0", "-3", "abc", "1.5", ""] {
            assert_matches!(
                parse_task_id(raw),
                Err(AppError::Core(CoreError::NotFound { entity: "Task", .. }))
            );
        }
    }

    #[tokio::test]
    async fn owner_gets_the_task() {
        let (store, task) = store_with_task(1).await;
        let found = find_and_authorize(&store, &task.id.to_string(), &AuthUser { user_id: 1 })
            .await
            .unwrap();
        assert_eq!(found.id, task.id);
    }

    #[tokio::test]
    async fn other_user_is_forbidden() {
        let (store, task) = store_with_task(1).await;
        let result =
            find_and_authorize(&store, &task.id.to_string(), &AuthUser { user_id: 2 }).await;
        assert_matches!(result, Err(AppError::Core(CoreError::Forbidden(_))));
    }

    #[tokio::test]
    async fn missing_task_is_not_found_for_everyone() {
        let (store, _task) = store_with_task(1).await;
        for user_id in [1, 2] {
            let result = find_and_authorize(&store, "999", &AuthUser { user_id }).await;
            assert_matches!(result, Err(AppError::Core(CoreError::NotFound { .. })));
        }
    }
}
