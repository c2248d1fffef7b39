//! # Artifact Repository
//!
//! Stored texts belonging to a processed file: the upload itself, the
//! rendered report and the error log. Keyed by `(file_id, kind)`.

use chrono::Utc;
use serde::Serialize;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use tally_core::ArtifactKind;

/// An artifact to be written alongside a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewArtifact {
    pub file_id: String,
    pub kind: ArtifactKind,
    /// Stored file name, e.g. `{file_id}_output.txt`.
    pub name: String,
    pub content: String,
}

impl NewArtifact {
    pub fn new(
        file_id: impl Into<String>,
        kind: ArtifactKind,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        NewArtifact {
            file_id: file_id.into(),
            kind,
            name: name.into(),
            content: content.into(),
        }
    }
}

/// An artifact read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct StoredArtifact {
    pub name: String,
    pub content: String,
}

/// Repository for stored artifacts.
#[derive(Debug, Clone)]
pub struct ArtifactRepository {
    pool: SqlitePool,
}

impl ArtifactRepository {
    /// Creates a new ArtifactRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ArtifactRepository { pool }
    }

    /// Gets the artifact of `kind` for a file.
    pub async fn get(&self, file_id: &str, kind: ArtifactKind) -> DbResult<Option<StoredArtifact>> {
        let artifact = sqlx::query_as::<_, StoredArtifact>(
            r#"
            SELECT name, content
            FROM artifacts
            WHERE file_id = ?1 AND kind = ?2
            "#,
        )
        .bind(file_id)
        .bind(kind)
        .fetch_optional(&self.pool)
        .await?;

        Ok(artifact)
    }

    /// Lists the kinds stored for a file.
    pub async fn kinds_for(&self, file_id: &str) -> DbResult<Vec<ArtifactKind>> {
        let kinds = sqlx::query_scalar::<_, ArtifactKind>(
            "SELECT kind FROM artifacts WHERE file_id = ?1 ORDER BY kind",
        )
        .bind(file_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(kinds)
    }
}

/// Inserts one artifact on an open connection (usually a transaction).
pub(crate) async fn insert(conn: &mut SqliteConnection, artifact: &NewArtifact) -> DbResult<()> {
    debug!(
        file_id = %artifact.file_id,
        kind = %artifact.kind,
        bytes = artifact.content.len(),
        "Inserting artifact"
    );

    sqlx::query(
        r#"
        INSERT INTO artifacts (file_id, kind, name, content, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5)
        "#,
    )
    .bind(&artifact.file_id)
    .bind(artifact.kind)
    .bind(&artifact.name)
    .bind(&artifact.content)
    .bind(Utc::now())
    .execute(conn)
    .await?;

    Ok(())
}
