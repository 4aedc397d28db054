use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

use super::DatabaseSetupError;

/// An in-memory database only lives as long as its single connection.
const MEMORY_MAX_CONNECTIONS: u32 = 1;
const FILE_MAX_CONNECTIONS: u32 = 5;

pub async fn connect_sqlite(url: &url::Url) -> Result<SqlitePool, DatabaseSetupError> {
    let in_memory = url.as_str().contains(":memory:");

    let options = SqliteConnectOptions::from_str(url.as_str())
        .map_err(DatabaseSetupError::Unavailable)?
        .create_if_missing(true)
        .foreign_keys(true);

    let (options, max_connections) = if in_memory {
        (options, MEMORY_MAX_CONNECTIONS)
    } else {
        (
            options.journal_mode(SqliteJournalMode::Wal),
            FILE_MAX_CONNECTIONS,
        )
    };

    let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
    if in_memory {
        // the pool must never drop its only connection or the data goes with it
        pool_options = pool_options
            .min_connections(MEMORY_MAX_CONNECTIONS)
            .idle_timeout(None)
            .max_lifetime(None);
    }

    pool_options
        .connect_with(options)
        .await
        .map_err(DatabaseSetupError::Unavailable)
}

pub async fn migrate_sqlite(pool: &SqlitePool) -> Result<(), DatabaseSetupError> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .map_err(DatabaseSetupError::MigrationFailed)
}
