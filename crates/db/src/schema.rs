//! Table bootstrap and liveness probe.
//!
//! There are no migrations: the single `tasks` table is created on startup
//! if it does not exist yet.

use crate::store::{Store, StoreError};

/// DDL for the `tasks` table. No indexes beyond the primary key.
pub const CREATE_TASKS_TABLE: &str = "CREATE TABLE IF NOT EXISTS tasks (
    id UUID PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT NOT NULL,
    status TEXT NOT NULL
)";

/// Create the `tasks` table if it is missing. Safe to call repeatedly.
pub async fn ensure_schema(store: &Store) -> Result<(), StoreError> {
    store
        .transaction(|tx| {
            Box::pin(async move {
                sqlx::query(CREATE_TASKS_TABLE).execute(&mut **tx).await?;
                Ok::<_, StoreError>(())
            })
        })
        .await?;
    tracing::debug!("Ensured tasks table exists");
    Ok(())
}

/// Round-trip a trivial query to verify the database is reachable.
pub async fn health_check(store: &Store) -> Result<(), StoreError> {
    store
        .fetch_scalar(sqlx::query_scalar::<_, i32>("SELECT 1"))
        .await?;
    Ok(())
}
