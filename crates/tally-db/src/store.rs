//! # Submission Store
//!
//! The storage seam the HTTP layer depends on. Handlers hold an
//! `Arc<dyn SubmissionStore>` so tests and alternative backends can stand in
//! for SQLite.

use async_trait::async_trait;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::artifact::{NewArtifact, StoredArtifact};
use tally_core::{ArtifactKind, SubmissionEntry};

/// Persistence for submission history and artifacts.
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Writes the entry, its files and all artifacts atomically.
    async fn record_submission(
        &self,
        entry: &SubmissionEntry,
        artifacts: &[NewArtifact],
    ) -> DbResult<()>;

    /// All entries, newest first.
    async fn list_submissions(&self) -> DbResult<Vec<SubmissionEntry>>;

    async fn get_submission(&self, id: &str) -> DbResult<Option<SubmissionEntry>>;

    /// Whether an entry with this id is recorded, without loading it.
    async fn has_submission(&self, id: &str) -> DbResult<bool>;

    /// Removes the entry with its files and artifacts.
    /// Returns the deleted entry, `None` when missing.
    async fn delete_submission(&self, id: &str) -> DbResult<Option<SubmissionEntry>>;

    async fn read_artifact(
        &self,
        file_id: &str,
        kind: ArtifactKind,
    ) -> DbResult<Option<StoredArtifact>>;

    /// Whether the backend can serve queries.
    async fn is_healthy(&self) -> bool;
}

#[async_trait]
impl SubmissionStore for Database {
    async fn record_submission(
        &self,
        entry: &SubmissionEntry,
        artifacts: &[NewArtifact],
    ) -> DbResult<()> {
        self.submissions().insert(entry, artifacts).await
    }

    async fn list_submissions(&self) -> DbResult<Vec<SubmissionEntry>> {
        self.submissions().list().await
    }

    async fn get_submission(&self, id: &str) -> DbResult<Option<SubmissionEntry>> {
        self.submissions().get(id).await
    }

    async fn has_submission(&self, id: &str) -> DbResult<bool> {
        self.submissions().exists(id).await
    }

    async fn delete_submission(&self, id: &str) -> DbResult<Option<SubmissionEntry>> {
        self.submissions().delete(id).await
    }

    async fn read_artifact(
        &self,
        file_id: &str,
        kind: ArtifactKind,
    ) -> DbResult<Option<StoredArtifact>> {
        self.artifacts().get(file_id, kind).await
    }

    async fn is_healthy(&self) -> bool {
        self.health_check().await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
