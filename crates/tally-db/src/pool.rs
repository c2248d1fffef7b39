//! # Opening the Store
//!
//! Turns a [`DbConfig`] into a live [`Database`]: a shared SQLite pool with
//! the schema brought up to date.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Opening the store                               │
//! │                                                                         │
//! │  TALLY_DATABASE_PATH ──► DbConfig::new(path)                            │
//! │  tests               ──► DbConfig::in_memory()                          │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  Database::new ── mkdir parent ── connect pool ── apply migrations      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │  Database (Clone) ── submissions() / artifacts() / SubmissionStore      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! File databases run in WAL mode so history reads proceed while an upload
//! is being recorded. Foreign keys are switched on for every connection;
//! deleting a submission relies on them to cascade to files and artifacts.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::migrations;
use crate::repository::artifact::ArtifactRepository;
use crate::repository::submission::SubmissionRepository;

/// Where the SQLite data lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    File(PathBuf),
    /// Private to the pool; gone once the pool closes.
    Memory,
}

/// Settings for [`Database::new`].
///
/// ```rust,ignore
/// let config = DbConfig::new("data/tally.db").max_connections(8);
/// ```
#[derive(Debug, Clone)]
pub struct DbConfig {
    pub location: DbLocation,
    pub max_connections: u32,
    pub min_connections: u32,
    /// How long a request may wait for a free connection.
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    /// Apply embedded migrations as part of opening. On by default.
    pub run_migrations: bool,
}

impl DbConfig {
    fn with_location(location: DbLocation) -> Self {
        DbConfig {
            location,
            max_connections: 5,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(600),
            run_migrations: true,
        }
    }

    /// A file-backed store. Missing parent directories are created on open.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_location(DbLocation::File(path.into()))
    }

    /// A throwaway store for tests.
    ///
    /// Each SQLite connection to `:memory:` sees its own empty database, so
    /// the pool is pinned to one connection.
    pub fn in_memory() -> Self {
        DbConfig {
            max_connections: 1,
            connect_timeout: Duration::from_secs(5),
            idle_timeout: Duration::from_secs(60),
            ..Self::with_location(DbLocation::Memory)
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn run_migrations(mut self, run: bool) -> Self {
        self.run_migrations = run;
        self
    }

    async fn connect_options(&self) -> DbResult<SqliteConnectOptions> {
        let options = match &self.location {
            DbLocation::Memory => SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::ConnectionFailed(e.to_string()))?,
            DbLocation::File(path) => {
                if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(dir)
                        .await
                        .map_err(|e| DbError::io(dir, e))?;
                }
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true)
                    .journal_mode(SqliteJournalMode::Wal)
            }
        };

        Ok(options
            .foreign_keys(true)
            .synchronous(SqliteSynchronous::Normal))
    }
}

/// Handle to the submission store.
///
/// Clones share one pool, so the HTTP layer can hand a copy to every
/// request.
///
/// ```rust,ignore
/// let history = db.submissions().list().await?;
/// let report = db.artifacts().get(&file_id, ArtifactKind::Output).await?;
/// ```
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Opens the store described by `config`.
    pub async fn new(config: DbConfig) -> DbResult<Self> {
        info!(location = ?config.location, "Opening submission store");

        let options = config.connect_options().await?;
        debug!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "Connecting pool"
        );

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .idle_timeout(Some(config.idle_timeout))
            .connect_with(options)
            .await
            .map_err(|e| DbError::ConnectionFailed(e.to_string()))?;

        let db = Database { pool };
        if config.run_migrations {
            db.run_migrations().await?;
        }

        info!("Submission store ready");
        Ok(db)
    }

    /// Brings the schema up to date. Only needed when the config opted out.
    pub async fn run_migrations(&self) -> DbResult<()> {
        migrations::run_migrations(&self.pool).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn submissions(&self) -> SubmissionRepository {
        SubmissionRepository::new(self.pool.clone())
    }

    pub fn artifacts(&self) -> ArtifactRepository {
        ArtifactRepository::new(self.pool.clone())
    }

    /// Waits for checked-out connections to return, then shuts the pool.
    pub async fn close(&self) {
        info!("Closing submission store");
        self.pool.close().await;
    }

    /// `true` while a trivial query still round-trips.
    pub async fn health_check(&self) -> bool {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_store_is_migrated() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.health_check().await);

        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert!(embedded >= 1);
        assert_eq!(embedded, applied);
    }

    #[tokio::test]
    async fn test_opting_out_of_migrations() {
        let config = DbConfig::in_memory().run_migrations(false);
        let db = Database::new(config).await.unwrap();

        let (embedded, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, 0);

        db.run_migrations().await.unwrap();
        let (_, applied) = migrations::migration_status(db.pool()).await.unwrap();
        assert_eq!(applied, embedded);
    }

    #[test]
    fn test_config_defaults_and_overrides() {
        let file = DbConfig::new("data/tally.db")
            .max_connections(8)
            .min_connections(2)
            .connect_timeout(Duration::from_secs(3));
        assert_eq!(file.location, DbLocation::File(PathBuf::from("data/tally.db")));
        assert_eq!(file.max_connections, 8);
        assert_eq!(file.min_connections, 2);
        assert_eq!(file.connect_timeout, Duration::from_secs(3));
        assert!(file.run_migrations);

        let memory = DbConfig::in_memory();
        assert_eq!(memory.location, DbLocation::Memory);
        assert_eq!(memory.max_connections, 1);
    }

    #[tokio::test]
    async fn test_file_store_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("tally.db");

        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        assert!(db.health_check().await);
        assert!(path.exists());

        db.close().await;
        assert!(!db.health_check().await);
    }

    #[tokio::test]
    async fn test_migration_status_on_closed_pool_is_error() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.close().await;

        let err = migrations::migration_status(db.pool()).await.unwrap_err();
        assert!(matches!(err, DbError::ConnectionFailed(_)));
    }
}
