//! History and artifact lookups.

use tracing::info;

use crate::error::{ApiError, ApiResult};
use tally_core::{ArtifactKind, SubmissionEntry};
use tally_db::{StoredArtifact, SubmissionStore};

/// All submissions, newest first.
pub async fn history(store: &dyn SubmissionStore) -> ApiResult<Vec<SubmissionEntry>> {
    Ok(store.list_submissions().await?)
}

pub async fn submission(store: &dyn SubmissionStore, id: &str) -> ApiResult<SubmissionEntry> {
    store
        .get_submission(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))
}

/// Deletes a submission together with its stored artifacts.
pub async fn delete(store: &dyn SubmissionStore, id: &str) -> ApiResult<SubmissionEntry> {
    let deleted = store
        .delete_submission(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Submission not found".to_string()))?;

    info!(submission_id = %id, files = deleted.files.len(), "Submission deleted");
    Ok(deleted)
}

/// The report or error log of one processed file.
pub async fn artifact(
    store: &dyn SubmissionStore,
    file_id: &str,
    kind: ArtifactKind,
) -> ApiResult<StoredArtifact> {
    store.read_artifact(file_id, kind).await?.ok_or_else(|| {
        let what = match kind {
            ArtifactKind::Upload => "Uploaded file",
            ArtifactKind::Output => "Output file",
            ArtifactKind::Error => "Error file",
        };
        ApiError::NotFound(format!("{} not found", what))
    })
}

/// Parses the `{type}` segment of a download path.
///
/// Only the report and the error log are downloadable.
pub fn download_kind(raw: &str) -> ApiResult<ArtifactKind> {
    match raw.parse::<ArtifactKind>() {
        Ok(kind @ (ArtifactKind::Output | ArtifactKind::Error)) => Ok(kind),
        _ => Err(ApiError::InvalidRequest("Invalid file type".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::ingestion::{ingest, UploadedFile};
    use tally_db::{Database, DbConfig};

    async fn store() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_download_kind() {
        assert_eq!(download_kind("output").unwrap(), ArtifactKind::Output);
        assert_eq!(download_kind("error").unwrap(), ArtifactKind::Error);
        assert!(matches!(download_kind("upload"), Err(ApiError::InvalidRequest(_))));
        assert!(matches!(download_kind("pdf"), Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_missing_lookups_are_not_found() {
        let db = store().await;

        assert!(matches!(submission(&db, "nope").await, Err(ApiError::NotFound(_))));
        assert!(matches!(delete(&db, "nope").await, Err(ApiError::NotFound(_))));

        let err = artifact(&db, "nope", ArtifactKind::Output).await.unwrap_err();
        assert_eq!(err.to_string(), "Output file not found");
    }

    #[tokio::test]
    async fn test_history_delete_round_trip() {
        let db = store().await;
        let first = ingest(&db, vec![UploadedFile::new("a.txt", "bad")]).await.unwrap();
        let second = ingest(&db, vec![UploadedFile::new("b.txt", "bad")]).await.unwrap();

        let listed = history(&db).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, second.id);

        let deleted = delete(&db, &first.id).await.unwrap();
        assert_eq!(deleted.id, first.id);

        let remaining = history(&db).await.unwrap();
        assert_eq!(remaining, vec![second]);

        let err = artifact(&db, &first.files[0].id, ArtifactKind::Error).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
