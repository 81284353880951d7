//! Persistence for users and tasks.
//!
//! - [`repositories`] -- zero-sized PostgreSQL repositories taking `&PgPool`.
//! - [`store`] -- the [`UserStore`] / [`TaskStore`] seams the HTTP layer talks to,
//!   with a PostgreSQL implementation ([`PgStore`]).
//! - [`memory`] -- an in-process implementation ([`MemoryStore`]) used for local
//!   development without a database and by the integration tests.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod memory;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use memory::MemoryStore;
pub use store::{PgStore, TaskStore, UserStore};

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the embedded migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
