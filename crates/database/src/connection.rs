use crate::error::DbError;
use configuration::{DatabaseSettings, StorageLocation};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use std::time::Duration;

/// Establishes a connection pool to the farm store.
///
/// The location comes from [`configuration::resolve_from_environment`]. The
/// database file is created if it does not exist yet, and foreign keys are
/// enforced on every connection. An operation that cannot obtain a connection
/// within `acquire_timeout_secs` fails with `DbError::Storage` instead of
/// waiting indefinitely.
pub async fn connect(
    location: &StorageLocation,
    settings: &DatabaseSettings,
) -> Result<SqlitePool, DbError> {
    let timeout = Duration::from_secs(settings.acquire_timeout_secs);
    let options = SqliteConnectOptions::from_str(&location.url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(timeout);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(timeout)
        .connect_with(options)
        .await?;

    tracing::info!(source = ?location.source, "Connected to the farm store.");
    Ok(pool)
}

/// Opens a private in-memory store, for tests and throwaway sessions.
///
/// The pool keeps exactly one connection alive for its whole lifetime, since
/// the in-memory database disappears with its last connection.
pub async fn connect_in_memory() -> Result<SqlitePool, DbError> {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    Ok(pool)
}
