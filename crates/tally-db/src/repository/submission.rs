//! # Submission Repository
//!
//! The submission history log: one row per upload request, one row per file
//! it produced, plus the file's artifacts.
//!
//! ## Submission Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Submission Lifecycle                               │
//! │                                                                         │
//! │  1. RECORD (one transaction)                                           │
//! │     └── submissions       ← id, created_at                             │
//! │     └── submission_files  ← one row per file, in upload order          │
//! │     └── artifacts         ← upload / output / error texts              │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     └── list() newest first, get(id)                                   │
//! │                                                                         │
//! │  3. DELETE                                                             │
//! │     └── submissions row removed, files and artifacts cascade           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::repository::artifact::{self, NewArtifact};
use tally_core::{SubmissionEntry, SubmissionFile};

#[derive(Debug, sqlx::FromRow)]
struct SubmissionRow {
    id: String,
    created_at: String,
}

#[derive(Debug, sqlx::FromRow)]
struct FileRow {
    id: String,
    submission_id: String,
    filename: String,
    output_file: String,
    error_file: String,
}

impl From<FileRow> for SubmissionFile {
    fn from(row: FileRow) -> Self {
        SubmissionFile {
            id: row.id,
            filename: row.filename,
            output_file: row.output_file,
            error_file: row.error_file,
        }
    }
}

/// Fixed-width RFC 3339 so `ORDER BY created_at` sorts chronologically.
fn encode_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn decode_timestamp(raw: &str) -> DbResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| DbError::Internal(format!("Bad stored timestamp '{}': {}", raw, e)))
}

/// Repository for submission history.
#[derive(Debug, Clone)]
pub struct SubmissionRepository {
    pool: SqlitePool,
}

impl SubmissionRepository {
    /// Creates a new SubmissionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SubmissionRepository { pool }
    }

    /// Records a submission, its files and their artifacts atomically.
    ///
    /// ## Errors
    /// - `UniqueViolation` when the submission or a file id already exists
    /// - `ForeignKeyViolation` when an artifact names a file not in `entry`
    pub async fn insert(&self, entry: &SubmissionEntry, artifacts: &[NewArtifact]) -> DbResult<()> {
        debug!(
            id = %entry.id,
            files = entry.files.len(),
            artifacts = artifacts.len(),
            "Recording submission"
        );

        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO submissions (id, created_at) VALUES (?1, ?2)")
            .bind(&entry.id)
            .bind(encode_timestamp(&entry.timestamp))
            .execute(&mut *tx)
            .await?;

        for (position, file) in entry.files.iter().enumerate() {
            sqlx::query(
                r#"
                INSERT INTO submission_files (
                    id, submission_id, position, filename, output_file, error_file
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&file.id)
            .bind(&entry.id)
            .bind(position as i64)
            .bind(&file.filename)
            .bind(&file.output_file)
            .bind(&file.error_file)
            .execute(&mut *tx)
            .await?;
        }

        for item in artifacts {
            artifact::insert(&mut *tx, item).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %entry.id, files = entry.files.len(), "Submission recorded");
        Ok(())
    }

    /// Lists every submission, newest first.
    ///
    /// Submissions sharing a timestamp come back most recently inserted first.
    pub async fn list(&self) -> DbResult<Vec<SubmissionEntry>> {
        let rows = sqlx::query_as::<_, SubmissionRow>(
            r#"
            SELECT id, created_at
            FROM submissions
            ORDER BY created_at DESC, seq DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let file_rows = sqlx::query_as::<_, FileRow>(
            r#"
            SELECT id, submission_id, filename, output_file, error_file
            FROM submission_files
            ORDER BY submission_id, position
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        let mut files_by_submission: HashMap<String, Vec<SubmissionFile>> = HashMap::new();
        for row in file_rows {
            files_by_submission
                .entry(row.submission_id.clone())
                .or_default()
                .push(row.into());
        }

        rows.into_iter()
            .map(|row| {
                let files = files_by_submission.remove(&row.id).unwrap_or_default();
                Ok(SubmissionEntry {
                    timestamp: decode_timestamp(&row.created_at)?,
                    id: row.id,
                    files,
                })
            })
            .collect()
    }

    /// Gets a submission by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<SubmissionEntry>> {
        let mut conn = self.pool.acquire().await?;
        fetch_entry(&mut *conn, id).await
    }

    /// Returns true when a submission with this ID is recorded.
    pub async fn exists(&self, id: &str) -> DbResult<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM submissions WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(found.is_some())
    }

    /// Deletes a submission with its files and artifacts.
    ///
    /// ## Returns
    /// The deleted entry, or `None` when no submission had this ID.
    pub async fn delete(&self, id: &str) -> DbResult<Option<SubmissionEntry>> {
        let mut tx = self.pool.begin().await?;

        let Some(entry) = fetch_entry(&mut *tx, id).await? else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM submissions WHERE id = ?1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(id = %id, files = entry.files.len(), "Submission deleted");
        Ok(Some(entry))
    }

    /// Counts recorded submissions.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM submissions")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

async fn fetch_entry(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<SubmissionEntry>> {
    let Some(row) = sqlx::query_as::<_, SubmissionRow>(
        "SELECT id, created_at FROM submissions WHERE id = ?1",
    )
    .bind(id)
    .fetch_optional(&mut *conn)
    .await?
    else {
        return Ok(None);
    };

    let files = sqlx::query_as::<_, FileRow>(
        r#"
        SELECT id, submission_id, filename, output_file, error_file
        FROM submission_files
        WHERE submission_id = ?1
        ORDER BY position
        "#,
    )
    .bind(id)
    .fetch_all(&mut *conn)
    .await?
    .into_iter()
    .map(SubmissionFile::from)
    .collect();

    Ok(Some(SubmissionEntry {
        timestamp: decode_timestamp(&row.created_at)?,
        id: row.id,
        files,
    }))
}
