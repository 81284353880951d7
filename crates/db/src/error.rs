/// Name of the unique constraint guarding user emails.
pub const UQ_USERS_EMAIL: &str = "uq_users_email";

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

/// Failure reported by a [`UserStore`](crate::UserStore) or
/// [`TaskStore`](crate::TaskStore) implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write. `constraint` follows the
    /// `uq_<table>_<column>` naming used by the migrations.
    #[error("Unique constraint violated: {constraint}")]
    UniqueViolation { constraint: String },

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

impl StoreError {
    /// True when the write collided with an existing user email.
    pub fn is_duplicate_email(&self) -> bool {
        matches!(self, StoreError::UniqueViolation { constraint } if constraint == UQ_USERS_EMAIL)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                return StoreError::UniqueViolation {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}
