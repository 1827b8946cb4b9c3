//! Scoped, unpooled database connection.
//!
//! A `ScopedConnection` owns exactly one driver connection for the duration
//! of a request. Every open guard is counted in a shared `OpenConnections`
//! gauge; the count drops when the guard is released or dropped, so a leak
//! shows up as a non-zero gauge once all requests have finished.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use sqlx::Connection;

/// Shared count of connections currently held by guards.
#[derive(Debug, Clone, Default)]
pub struct OpenConnections(Arc<AtomicUsize>);

impl OpenConnections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }

    fn acquire(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Guard around a single connection.
///
/// Call [`ScopedConnection::release`] on every exit path to close the
/// connection gracefully. If the guard is dropped instead (for example when
/// the request future is cancelled), the driver connection is dropped with
/// it and the gauge is still decremented.
pub struct ScopedConnection<C: Connection> {
    conn: Option<C>,
    gauge: OpenConnections,
}

impl<C: Connection> ScopedConnection<C> {
    /// Opens a new connection and registers it with `gauge`.
    pub async fn open(
        options: &<C as Connection>::Options,
        gauge: &OpenConnections,
    ) -> Result<Self, sqlx::Error> {
        let conn = C::connect_with(options).await?;
        gauge.acquire();
        Ok(Self {
            conn: Some(conn),
            gauge: gauge.clone(),
        })
    }

    /// Borrows the underlying connection for use as an executor.
    pub fn get_mut(&mut self) -> &mut C {
        // Only `release` takes the connection, and it consumes the guard.
        self.conn
            .as_mut()
            .unwrap_or_else(|| unreachable!("connection used after release"))
    }

    /// Closes the connection. Close failures are logged, not returned: the
    /// connection is gone either way.
    pub async fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err(e) = conn.close().await {
                tracing::warn!(error = %e, "error while closing database connection");
            }
        }
    }
}

impl<C: Connection> Drop for ScopedConnection<C> {
    fn drop(&mut self) {
        self.gauge.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqliteConnectOptions;
    use sqlx::SqliteConnection;
    use std::str::FromStr;

    fn options() -> SqliteConnectOptions {
        SqliteConnectOptions::from_str("sqlite::memory:").unwrap()
    }

    #[tokio::test]
    async fn test_release_returns_gauge_to_zero() {
        let gauge = OpenConnections::new();
        for _ in 0..10 {
            let mut conn = ScopedConnection::<SqliteConnection>::open(&options(), &gauge)
                .await
                .unwrap();
            assert_eq!(gauge.get(), 1);
            sqlx::query("SELECT 1").execute(conn.get_mut()).await.unwrap();
            conn.release().await;
        }
        assert_eq!(gauge.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_query_still_releases() {
        let gauge = OpenConnections::new();
        let mut conn = ScopedConnection::<SqliteConnection>::open(&options(), &gauge)
            .await
            .unwrap();
        let result = sqlx::query("SELECT * FROM missing").execute(conn.get_mut()).await;
        conn.release().await;
        assert!(result.is_err());
        assert_eq!(gauge.get(), 0);
    }

    #[tokio::test]
    async fn test_drop_without_release() {
        let gauge = OpenConnections::new();
        {
            let _a = ScopedConnection::<SqliteConnection>::open(&options(), &gauge)
                .await
                .unwrap();
            let _b = ScopedConnection::<SqliteConnection>::open(&options(), &gauge)
                .await
                .unwrap();
            assert_eq!(gauge.get(), 2);
        }
        assert_eq!(gauge.get(), 0);
    }

    #[tokio::test]
    async fn test_failed_open_is_not_counted() {
        let gauge = OpenConnections::new();
        let options = SqliteConnectOptions::from_str("sqlite:///nonexistent-dir/x/y.db")
            .unwrap()
            .create_if_missing(false);
        assert!(ScopedConnection::<SqliteConnection>::open(&options, &gauge)
            .await
            .is_err());
        assert_eq!(gauge.get(), 0);
    }
}
