//! # Storage Errors
//!
//! Everything tally-db can fail with, whether it comes from SQLite or from
//! reading an old history directory during a legacy import.
//!
//! ```text
//! sqlx::Error ─────────┐
//! MigrateError ────────┼──► DbError ──► ApiError::Storage (tally-api, HTTP 500)
//! io / serde_json ─────┘
//! ```

use std::path::Path;

use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// A query that must return a row returned none.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A submission or file id was recorded twice.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// An artifact or file row pointed at a parent that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Commit or rollback of a multi-row write failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// No connection became free within the acquire timeout.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },

    /// `history.json` could not be read as a list of submissions.
    #[error("Invalid legacy history: {0}")]
    Json(String),

    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn io(path: impl AsRef<Path>, err: std::io::Error) -> Self {
        DbError::Io {
            path: path.as_ref().display().to_string(),
            message: err.to_string(),
        }
    }

    /// Classifies a constraint failure reported by SQLite.
    ///
    /// SQLite names the offending column as `table.column` after the colon
    /// but never echoes the value. Primary-key clashes carry the same
    /// "UNIQUE constraint failed" text.
    fn from_database(kind: ErrorKind, message: &str) -> Self {
        let detail = message
            .split_once(": ")
            .map(|(_, rest)| rest)
            .unwrap_or(message);
        let unique = matches!(kind, ErrorKind::UniqueViolation)
            || message.starts_with("UNIQUE constraint failed");
        let foreign_key = matches!(kind, ErrorKind::ForeignKeyViolation)
            || message.starts_with("FOREIGN KEY constraint failed");

        if unique {
            DbError::UniqueViolation {
                field: detail.to_string(),
                value: "unknown".to_string(),
            }
        } else if foreign_key {
            DbError::ForeignKeyViolation {
                message: message.to_string(),
            }
        } else {
            DbError::QueryFailed(message.to_string())
        }
    }
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => DbError::from_database(db_err.kind(), db_err.message()),
            sqlx::Error::RowNotFound => DbError::NotFound {
                entity: "Row".to_string(),
                id: "unknown".to_string(),
            },
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

impl From<serde_json::Error> for DbError {
    fn from(err: serde_json::Error) -> Self {
        DbError::Json(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
