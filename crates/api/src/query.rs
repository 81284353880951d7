//! Query parameter types for API handlers.

use serde::Deserialize;
use taskkeep_core::error::CoreError;
use taskkeep_db::models::task::TaskFilter;

use crate::handlers::tasks::parse_status;

/// `GET /tasks?status=&search=`. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub search: Option<String>,
}

impl TaskListParams {
    pub fn into_filter(self) -> Result<TaskFilter, CoreError> {
        Ok(TaskFilter {
            status: parse_status(self.status.as_deref())?,
            search: self
                .search
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        })
    }
}
