//! Storage seams used by the HTTP layer.
//!
//! Handlers and the credential layer depend on these traits rather than on a
//! pool, so the same request path runs against PostgreSQL in production and
//! against [`MemoryStore`](crate::MemoryStore) in tests and local runs.

use async_trait::async_trait;
use taskkeep_core::types::DbId;

use crate::error::StoreError;
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::{CreateUser, UpdateUser, User};
use crate::repositories::{TaskRepo, UserRepo};
use crate::DbPool;

/// User identity records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user. A duplicate email yields [`StoreError::UniqueViolation`].
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError>;

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError>;

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Apply a profile update. `None` when the user does not exist.
    async fn update_user(&self, id: DbId, input: &UpdateUser)
        -> Result<Option<User>, StoreError>;

    /// Confirm the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Task records. Every mutation is a single operation keyed by `(id, owner_id)`.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn create_task(&self, owner_id: DbId, input: &CreateTask) -> Result<Task, StoreError>;

    async fn find_task_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError>;

    /// Newest first, always restricted to `owner_id`.
    async fn list_tasks(&self, owner_id: DbId, filter: &TaskFilter)
        -> Result<Vec<Task>, StoreError>;

    async fn update_task(
        &self,
        id: DbId,
        owner_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, StoreError>;

    async fn delete_task(&self, id: DbId, owner_id: DbId) -> Result<bool, StoreError>;
}

/// PostgreSQL-backed store delegating to the repositories.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn create_user(&self, input: &CreateUser) -> Result<User, StoreError> {
        Ok(UserRepo::create(&self.pool, input).await?)
    }

    async fn find_user_by_id(&self, id: DbId) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::find_by_email(&self.pool, email).await?)
    }

    async fn update_user(
        &self,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, StoreError> {
        Ok(UserRepo::update(&self.pool, id, input).await?)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(crate::health_check(&self.pool).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn create_task(&self, owner_id: DbId, input: &CreateTask) -> Result<Task, StoreError> {
        Ok(TaskRepo::create(&self.pool, owner_id, input).await?)
    }

    async fn find_task_by_id(&self, id: DbId) -> Result<Option<Task>, StoreError> {
        Ok(TaskRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_tasks(
        &self,
        owner_id: DbId,
        filter: &TaskFilter,
    ) -> Result<Vec<Task>, StoreError> {
        Ok(TaskRepo::list_for_owner(&self.pool, owner_id, filter).await?)
    }

    async fn update_task(
        &self,
        id: DbId,
        owner_id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, StoreError> {
        Ok(TaskRepo::update(&self.pool, id, owner_id, input).await?)
    }

    async fn delete_task(&self, id: DbId, owner_id: DbId) -> Result<bool, StoreError> {
        Ok(TaskRepo::delete(&self.pool, id, owner_id).await?)
    }
}
