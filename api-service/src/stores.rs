//! Data store access.
//!
//! The primary store is PostgreSQL, reached through a fresh connection per
//! request. The secondary store is a SQLite file behind a small pool that is
//! opened once at startup and shared by every request.

use std::time::Duration;

use common::config::{PrimaryStoreConfig, SecondaryStoreConfig};
use common::errors::{AppError, AppResult};
use common::utils::{OpenConnections, ScopedConnection};
use sqlx::postgres::PgRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{FromRow, PgConnection, SqlitePool};

/// Primary (PostgreSQL) store. Holds configuration only; connections are
/// opened and closed per call.
#[derive(Clone)]
pub struct PrimaryStore {
    config: PrimaryStoreConfig,
    open: OpenConnections,
}

impl PrimaryStore {
    pub fn new(config: PrimaryStoreConfig) -> Self {
        Self {
            config,
            open: OpenConnections::new(),
        }
    }

    /// Number of connections currently open.
    pub fn open_connections(&self) -> usize {
        self.open.get()
    }

    async fn connect(&self) -> AppResult<ScopedConnection<PgConnection>> {
        let options = self.config.connect_options();
        match ScopedConnection::<PgConnection>::open(&options, &self.open).await {
            Ok(conn) => {
                tracing::info!(
                    db = %self.config.database,
                    host = %self.config.host,
                    "Successfully connected to the database"
                );
                Ok(conn)
            }
            Err(e) => {
                tracing::error!(error = %e, "Error connecting to PostgreSQL database");
                Err(AppError::DatabaseConnection(e.to_string()))
            }
        }
    }

    /// Runs `sql` on a dedicated connection and maps every row to `T`.
    ///
    /// The connection is closed before returning, whether the query
    /// succeeded or not.
    pub async fn fetch_all<T>(&self, sql: &str) -> AppResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut conn = self.connect().await?;
        let result = sqlx::query_as::<_, T>(sql).fetch_all(conn.get_mut()).await;
        conn.release().await;
        result.map_err(|e| AppError::DatabaseQuery(e.to_string()))
    }
}

/// Secondary (SQLite) store shared by all requests.
///
/// Concurrency is bounded by the pool; no other synchronisation is added.
#[derive(Clone)]
pub struct SecondaryStore {
    pool: SqlitePool,
}

impl SecondaryStore {
    /// Opens the store. The file is created if missing, but no schema is.
    pub async fn connect(config: &SecondaryStoreConfig) -> AppResult<Self> {
        let options = SqliteConnectOptions::new()
            .filename(&config.path)
            .create_if_missing(true)
            .busy_timeout(Duration::from_secs(5));

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await
            .map_err(|e| {
                AppError::Config(format!(
                    "cannot open secondary store at {}: {}",
                    config.path.display(),
                    e
                ))
            })?;

        tracing::debug!(path = %config.path.display(), "Secondary store opened");
        Ok(Self { pool })
    }

    /// Runs a statement and maps every returned row to `T`. Statements that
    /// return no rows yield an empty list.
    pub async fn fetch_all<T>(&self, sql: &str) -> AppResult<Vec<T>>
    where
        T: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        sqlx::query_as::<_, T>(sql)
            .persistent(false)
            .fetch_all(&self.pool)
            .await
            .map_err(AppError::secondary)
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
