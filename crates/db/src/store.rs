//! Single-connection wrapper around PostgreSQL.
//!
//! [`Store`] owns at most one [`PgConnection`]. Every primitive reconnects
//! when no connection is held or the held one fails a ping, and any statement
//! failure closes and discards the connection before the error is returned,
//! so the next call starts from a fresh session. One failure invalidates the
//! connection regardless of its cause.
//!
//! The connection sits behind an async mutex: statements are serialized, and
//! a request waiting for its turn is suspended rather than blocking a
//! runtime thread.

use std::future::Future;

use futures::future::BoxFuture;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgQueryResult, PgRow};
use sqlx::query::{Query, QueryAs, QueryScalar};
use sqlx::{Connection, FromRow, PgConnection, Postgres, Transaction};
use tokio::sync::Mutex;

use crate::config::DatabaseConfig;

/// Errors raised by [`Store`].
///
/// `Connect` and `Disconnect` mean the database could not be reached or
/// released; `Query` means a live connection rejected a statement.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Failed to disconnect from database: {0}")]
    Disconnect(#[source] sqlx::Error),

    #[error("Query execution failed: {0}")]
    Query(#[source] sqlx::Error),
}

impl StoreError {
    /// `true` for connection-level failures, `false` for rejected statements.
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connect(_) | Self::Disconnect(_))
    }
}

/// Lets `?` propagate sqlx errors inside [`Store::transaction`] callbacks.
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        Self::Query(err)
    }
}

/// Owner of the process-wide database connection.
///
/// Share it behind an `Arc`; all methods take `&self`.
pub struct Store {
    options: PgConnectOptions,
    conn: Mutex<Option<PgConnection>>,
}

impl Store {
    /// Create a store for the given connect options. Does not connect.
    pub fn new(options: PgConnectOptions) -> Self {
        Self {
            options,
            conn: Mutex::new(None),
        }
    }

    /// Create a store from a [`DatabaseConfig`]. Does not connect.
    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::new(config.connect_options())
    }

    /// Open a connection unless a live one is already held.
    pub async fn connect(&self) -> Result<(), StoreError> {
        let mut slot = self.conn.lock().await;
        live(&self.options, &mut slot).await?;
        Ok(())
    }

    /// Close the held connection, if any.
    ///
    /// The slot is cleared before closing, so a failed close still leaves the
    /// store disconnected and the next call reconnects.
    pub async fn disconnect(&self) -> Result<(), StoreError> {
        let Some(conn) = self.conn.lock().await.take() else {
            return Ok(());
        };
        conn.close().await.map_err(StoreError::Disconnect)?;
        tracing::debug!("Database connection closed");
        Ok(())
    }

    /// Whether a connection is currently held.
    pub async fn is_connected(&self) -> bool {
        self.conn.lock().await.is_some()
    }

    /// Run a query and return every row.
    pub async fn fetch<'q, T>(
        &self,
        query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let mut slot = self.conn.lock().await;
        let conn = live(&self.options, &mut slot).await?;
        let result = query.fetch_all(&mut *conn).await;
        settle(&mut slot, result).await
    }

    /// Run a query and return the first row, if any.
    pub async fn fetch_one<'q, T>(
        &self,
        query: QueryAs<'q, Postgres, T, PgArguments>,
    ) -> Result<Option<T>, StoreError>
    where
        T: Send + Unpin + for<'r> FromRow<'r, PgRow>,
    {
        let mut slot = self.conn.lock().await;
        let conn = live(&self.options, &mut slot).await?;
        let result = query.fetch_optional(&mut *conn).await;
        settle(&mut slot, result).await
    }

    /// Run a query and return the first column of the first row, if any.
    pub async fn fetch_scalar<'q, O>(
        &self,
        query: QueryScalar<'q, Postgres, O, PgArguments>,
    ) -> Result<Option<O>, StoreError>
    where
        O: Send + Unpin,
        (O,): for<'r> FromRow<'r, PgRow>,
    {
        let mut slot = self.conn.lock().await;
        let conn = live(&self.options, &mut slot).await?;
        let result = query.fetch_optional(&mut *conn).await;
        settle(&mut slot, result).await
    }

    /// Run a statement and return its result (affected row count).
    pub async fn execute<'q>(
        &self,
        query: Query<'q, Postgres, PgArguments>,
    ) -> Result<PgQueryResult, StoreError> {
        let mut slot = self.conn.lock().await;
        let conn = live(&self.options, &mut slot).await?;
        let result = query.execute(&mut *conn).await;
        settle(&mut slot, result).await
    }

    /// Run `callback` inside a transaction.
    ///
    /// Commits when the callback returns `Ok`, rolls back when it returns
    /// `Err`. Query-kind failures (including a failed `BEGIN` or `COMMIT`)
    /// discard the connection afterwards.
    ///
    /// ```ignore
    /// store
    ///     .transaction(|tx| {
    ///         Box::pin(async move {
    ///             sqlx::query("DELETE FROM tasks").execute(&mut **tx).await?;
    ///             Ok(())
    ///         })
    ///     })
    ///     .await?;
    /// ```
    pub async fn transaction<F, R>(&self, callback: F) -> Result<R, StoreError>
    where
        F: for<'c> FnOnce(&'c mut Transaction<'_, Postgres>) -> BoxFuture<'c, Result<R, StoreError>>
            + Send,
        R: Send,
    {
        let mut slot = self.conn.lock().await;
        let conn = live(&self.options, &mut slot).await?;

        let outcome = match conn.begin().await {
            Ok(mut tx) => match callback(&mut tx).await {
                Ok(value) => tx.commit().await.map(|()| value).map_err(StoreError::Query),
                Err(err) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "Transaction rollback failed");
                    }
                    Err(err)
                }
            },
            Err(err) => Err(StoreError::Query(err)),
        };

        if matches!(outcome, Err(StoreError::Query(_))) {
            discard(&mut slot).await;
        }
        outcome
    }

    /// Connect, run `body`, then disconnect on every exit path.
    ///
    /// An error from `body` takes precedence over a disconnect error.
    pub async fn scoped<'a, F, Fut, T, E>(&'a self, body: F) -> Result<T, E>
    where
        F: FnOnce(&'a Self) -> Fut,
        Fut: Future<Output = Result<T, E>> + 'a,
        E: From<StoreError>,
    {
        self.connect().await?;
        let result = body(self).await;
        let released = self.disconnect().await;
        resolve_scope(result, released)
    }
}

/// Combine a scoped body's result with the outcome of the closing disconnect.
fn resolve_scope<T, E>(result: Result<T, E>, released: Result<(), StoreError>) -> Result<T, E>
where
    E: From<StoreError>,
{
    match (result, released) {
        (Err(err), Err(disconnect_err)) => {
            tracing::warn!(error = %disconnect_err, "Disconnect failed after scoped body error");
            Err(err)
        }
        (Err(err), Ok(())) => Err(err),
        (Ok(_), Err(disconnect_err)) => Err(disconnect_err.into()),
        (Ok(value), Ok(())) => Ok(value),
    }
}

/// Return the held connection, opening one first if the slot is empty or
/// the held connection no longer answers a ping.
async fn live<'g>(
    options: &PgConnectOptions,
    slot: &'g mut Option<PgConnection>,
) -> Result<&'g mut PgConnection, StoreError> {
    if let Some(mut conn) = slot.take() {
        match conn.ping().await {
            Ok(()) => return Ok(slot.insert(conn)),
            Err(err) => {
                tracing::warn!(error = %err, "Held database connection is closed, reconnecting");
                drop(conn);
            }
        }
    }

    let conn = PgConnection::connect_with(options)
        .await
        .map_err(StoreError::Connect)?;
    tracing::info!(
        host = options.get_host(),
        port = options.get_port(),
        "Database connection opened"
    );
    Ok(slot.insert(conn))
}

/// Pass a successful result through; on failure, discard the connection and
/// wrap the error as [`StoreError::Query`].
async fn settle<T>(
    slot: &mut Option<PgConnection>,
    result: Result<T, sqlx::Error>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            tracing::warn!(error = %err, "Statement failed, discarding database connection");
            discard(slot).await;
            Err(StoreError::Query(err))
        }
    }
}

async fn discard(slot: &mut Option<PgConnection>) {
    if let Some(conn) = slot.take() {
        if let Err(err) = conn.close().await {
            tracing::warn!(error = %err, "Failed to close discarded database connection");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disconnect_failure() -> Result<(), StoreError> {
        Err(StoreError::Disconnect(sqlx::Error::WorkerCrashed))
    }

    #[test]
    fn scope_success_passes_value_through() {
        let resolved: Result<u8, StoreError> = resolve_scope(Ok(7), Ok(()));
        assert_eq!(resolved.unwrap(), 7);
    }

    #[test]
    fn failed_disconnect_after_success_is_reported() {
        let resolved: Result<u8, StoreError> = resolve_scope(Ok(7), disconnect_failure());
        assert!(matches!(resolved, Err(StoreError::Disconnect(_))));
    }

    #[test]
    fn body_error_wins_over_failed_disconnect() {
        let resolved: Result<u8, StoreError> = resolve_scope(
            Err(StoreError::Query(sqlx::Error::RowNotFound)),
            disconnect_failure(),
        );
        assert!(matches!(
            resolved,
            Err(StoreError::Query(sqlx::Error::RowNotFound))
        ));
    }

    #[test]
    fn body_error_passes_through_clean_disconnect() {
        let resolved: Result<u8, StoreError> =
            resolve_scope(Err(StoreError::Query(sqlx::Error::RowNotFound)), Ok(()));
        assert!(matches!(
            resolved,
            Err(StoreError::Query(sqlx::Error::RowNotFound))
        ));
    }
}
