use std::time::Duration;

use async_trait::async_trait;

use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use tracing::{error, info};

use crate::config::DatabaseSettings;
use crate::feedback::{StoreError, StoreErrorKind, StoreHealth};

/// SQLSTATE raised by Postgres for unique constraint violations
const UNIQUE_VIOLATION: &str = "23505";

/// Errors from DatabaseManager
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("Database ping failed: {0}")]
    Ping(#[source] sqlx::Error),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Owns the single long-lived connection pool shared by all requests
#[derive(Clone)]
pub struct DatabaseManager {
    pool: PgPool,
}

impl DatabaseManager {
    /// Open the pool and verify connectivity. Callers treat any error here
    /// as fatal; the server must not start against a broken store.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self, DatabaseError> {
        info!(max_connections = settings.max_connections, "connecting db");

        let pool = PgPoolOptions::new()
            .max_connections(settings.max_connections)
            .acquire_timeout(Duration::from_secs(settings.connect_timeout_secs))
            .connect(&settings.url)
            .await
            .map_err(|e| {
                error!(error = %e, "open connection error");
                DatabaseError::Connect(e)
            })?;

        let manager = Self { pool };
        manager.health_check().await.map_err(|e| match e {
            DatabaseError::Sqlx(inner) => DatabaseError::Ping(inner),
            other => other,
        })?;

        info!("database connection verified");
        Ok(manager)
    }

    /// Wrap an existing pool (tests, embedding)
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Close the pool (e.g., on shutdown)
    pub async fn close(&self) {
        self.pool.close().await;
        info!("closed database pool");
    }
}

#[async_trait]
impl StoreHealth for DatabaseManager {
    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| classify(&e))
    }
}

/// Sort a driver error into the backend-neutral store taxonomy
pub fn classify(err: &sqlx::Error) -> StoreError {
    let kind = match err {
        sqlx::Error::Database(db_err) => classify_code(db_err.code().as_deref()),
        sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::WorkerCrashed => StoreErrorKind::Connectivity,
        _ => StoreErrorKind::Other,
    };
    StoreError::new(kind, err.to_string())
}

fn classify_code(code: Option<&str>) -> StoreErrorKind {
    match code {
        Some(UNIQUE_VIOLATION) => StoreErrorKind::ConstraintViolation,
        _ => StoreErrorKind::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_code_is_a_constraint_violation() {
        assert_eq!(classify_code(Some("23505")), StoreErrorKind::ConstraintViolation);
        // foreign key / not-null violations are not duplicates
        assert_eq!(classify_code(Some("23503")), StoreErrorKind::Other);
        assert_eq!(classify_code(Some("23502")), StoreErrorKind::Other);
        assert_eq!(classify_code(None), StoreErrorKind::Other);
    }

    #[test]
    fn pool_failures_are_connectivity() {
        assert_eq!(classify(&sqlx::Error::PoolTimedOut).kind, StoreErrorKind::Connectivity);
        assert_eq!(classify(&sqlx::Error::PoolClosed).kind, StoreErrorKind::Connectivity);

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        assert_eq!(classify(&sqlx::Error::Io(io)).kind, StoreErrorKind::Connectivity);
    }

    #[tokio::test]
    async fn connect_fails_when_store_is_unreachable() {
        // nothing listens on port 1
        let settings = DatabaseSettings {
            url: "postgres://db:db@127.0.0.1:1/db".to_string(),
            max_connections: 1,
            connect_timeout_secs: 1,
        };

        let result = DatabaseManager::connect(&settings).await;
        assert!(
            matches!(result, Err(DatabaseError::Connect(_))),
            "expected connect error, got {:?}",
            result.as_ref().err()
        );
    }

    #[test]
    fn other_driver_errors_keep_their_message() {
        let err = classify(&sqlx::Error::RowNotFound);
        assert_eq!(err.kind, StoreErrorKind::Other);
        assert!(!err.message.is_empty());
    }
}
