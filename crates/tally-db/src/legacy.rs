//! # Legacy History Import
//!
//! One-time migration of the old file-based layout into the database.
//!
//! ## Source Layout
//! ```text
//! <data_dir>/
//! ├── history.json          ← array of entries, newest first
//! ├── uploads/{id}_{name}   ← file as uploaded
//! ├── outputs/{id}_output.txt
//! └── errors/{id}_error.txt
//! ```
//!
//! Entries without a `files` key predate multi-file submissions and cannot be
//! mapped; they are counted and logged, never imported. Entries whose id is
//! already stored are skipped, so the import can be re-run safely.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::error::{DbError, DbResult};
use crate::repository::artifact::NewArtifact;
use crate::store::SubmissionStore;
use tally_core::{ArtifactKind, SubmissionEntry, SubmissionFile};

pub const HISTORY_FILE: &str = "history.json";
pub const UPLOAD_DIR: &str = "uploads";
pub const OUTPUT_DIR: &str = "outputs";
pub const ERROR_DIR: &str = "errors";

/// Outcome of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    /// Submissions written to the database.
    pub imported: usize,
    /// Entries dropped for lacking a `files` list.
    pub skipped_without_files: usize,
    /// Entries whose id was already stored.
    pub skipped_existing: usize,
    /// Artifact files referenced by history but absent on disk.
    pub missing_artifacts: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct LegacyEntry {
    id: String,
    timestamp: String,
    files: Vec<SubmissionFile>,
}

/// Accepts RFC 3339, or a naive ISO timestamp taken as UTC.
fn parse_legacy_timestamp(raw: &str) -> DbResult<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| DbError::Json(format!("Invalid timestamp '{}': {}", raw, e)))
}

/// Reads the history file and keeps only entries with a `files` list.
///
/// Returns the entries oldest first plus the number dropped.
async fn read_history(data_dir: &Path) -> DbResult<(Vec<LegacyEntry>, usize)> {
    let path = data_dir.join(HISTORY_FILE);
    let raw = tokio::fs::read_to_string(&path)
        .await
        .map_err(|e| DbError::io(&path, e))?;

    let items: Vec<serde_json::Value> = serde_json::from_str(&raw)?;

    let mut entries = Vec::with_capacity(items.len());
    let mut skipped = 0;

    for item in items {
        if item.get("files").is_none() {
            warn!(
                id = item.get("id").and_then(|v| v.as_str()).unwrap_or("<none>"),
                "Skipping legacy entry without files"
            );
            skipped += 1;
            continue;
        }
        entries.push(serde_json::from_value::<LegacyEntry>(item)?);
    }

    entries.reverse();
    Ok((entries, skipped))
}

/// Reads one artifact file; `None` when it does not exist.
async fn read_artifact_file(path: &Path) -> DbResult<Option<String>> {
    match tokio::fs::read(path).await {
        Ok(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(DbError::io(path, e)),
    }
}

/// Imports `<data_dir>/history.json` and its artifact files into `store`.
///
/// The history file is parsed in full before anything is written, so a
/// malformed file imports nothing.
pub async fn import_legacy_history(
    store: &dyn SubmissionStore,
    data_dir: &Path,
) -> DbResult<ImportReport> {
    info!(dir = %data_dir.display(), "Importing legacy history");

    let (entries, skipped_without_files) = read_history(data_dir).await?;
    let mut report = ImportReport {
        skipped_without_files,
        ..ImportReport::default()
    };

    for legacy in entries {
        if store.has_submission(&legacy.id).await? {
            report.skipped_existing += 1;
            continue;
        }

        let entry = SubmissionEntry {
            timestamp: parse_legacy_timestamp(&legacy.timestamp)?,
            id: legacy.id,
            files: legacy.files,
        };

        let mut artifacts = Vec::with_capacity(entry.files.len() * 3);
        for file in &entry.files {
            for (kind, dir) in [
                (ArtifactKind::Upload, UPLOAD_DIR),
                (ArtifactKind::Output, OUTPUT_DIR),
                (ArtifactKind::Error, ERROR_DIR),
            ] {
                let name = file.artifact_name(kind);
                let path = data_dir.join(dir).join(&name);
                match read_artifact_file(&path).await? {
                    Some(content) => artifacts.push(NewArtifact::new(&file.id, kind, name, content)),
                    None => {
                        warn!(path = %path.display(), "Legacy artifact missing");
                        report.missing_artifacts.push(path);
                    }
                }
            }
        }

        store.record_submission(&entry, &artifacts).await?;
        report.imported += 1;
    }

    info!(
        imported = report.imported,
        skipped_without_files = report.skipped_without_files,
        skipped_existing = report.skipped_existing,
        missing_artifacts = report.missing_artifacts.len(),
        "Legacy import finished"
    );

    Ok(report)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use std::fs;
    use tempfile::TempDir;

    const HISTORY: &str = r#"[
        {
            "id": "sub-new",
            "timestamp": "2024-03-02T09:30:00.123456",
            "files": [
                {"id": "f2", "filename": "b.txt", "output_file": "f2_output.txt", "error_file": "f2_error.txt"}
            ]
        },
        {
            "id": "old-style",
            "timestamp": "2024-01-01T00:00:00",
            "filename": "legacy.txt"
        },
        {
            "id": "sub-old",
            "timestamp": "2024-03-01T08:00:00+00:00",
            "files": [
                {"id": "f1", "filename": "a.txt", "output_file": "f1_output.txt", "error_file": "f1_error.txt"}
            ]
        }
    ]"#;

    fn fixture() -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        for sub in [UPLOAD_DIR, OUTPUT_DIR, ERROR_DIR] {
            fs::create_dir_all(root.join(sub)).unwrap();
        }
        fs::write(root.join(HISTORY_FILE), HISTORY).unwrap();

        fs::write(root.join(UPLOAD_DIR).join("f1_a.txt"), "A|C1|P|1|1.00|2024-01-01").unwrap();
        fs::write(root.join(OUTPUT_DIR).join("f1_output.txt"), "report one").unwrap();
        fs::write(root.join(ERROR_DIR).join("f1_error.txt"), "").unwrap();

        // f2 has no upload on disk
        fs::write(root.join(OUTPUT_DIR).join("f2_output.txt"), "report two").unwrap();
        fs::write(root.join(ERROR_DIR).join("f2_error.txt"), "bad line").unwrap();
        dir
    }

    #[tokio::test]
    async fn test_import_legacy_history() {
        let dir = fixture();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let report = import_legacy_history(&db, dir.path()).await.unwrap();

        assert_eq!(report.imported, 2);
        assert_eq!(report.skipped_without_files, 1);
        assert_eq!(report.skipped_existing, 0);
        assert_eq!(
            report.missing_artifacts,
            vec![dir.path().join(UPLOAD_DIR).join("f2_b.txt")]
        );

        let listed = db.list_submissions().await.unwrap();
        let ids: Vec<&str> = listed.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["sub-new", "sub-old"]);

        let output = db
            .read_artifact("f1", ArtifactKind::Output)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(output.name, "f1_output.txt");
        assert_eq!(output.content, "report one");

        let errors = db.read_artifact("f2", ArtifactKind::Error).await.unwrap().unwrap();
        assert_eq!(errors.content, "bad line");
        assert!(db.read_artifact("f2", ArtifactKind::Upload).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_import_is_rerunnable() {
        let dir = fixture();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        import_legacy_history(&db, dir.path()).await.unwrap();
        let second = import_legacy_history(&db, dir.path()).await.unwrap();

        assert_eq!(second.imported, 0);
        assert_eq!(second.skipped_existing, 2);
        assert_eq!(db.list_submissions().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_missing_history_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = import_legacy_history(&db, dir.path()).await.unwrap_err();
        assert!(matches!(err, DbError::Io { .. }));
    }

    #[tokio::test]
    async fn test_malformed_history_imports_nothing() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(HISTORY_FILE),
            r#"[{"id": "ok", "timestamp": "2024-01-01T00:00:00", "files": []},
                {"id": "broken", "files": "nope"}]"#,
        )
        .unwrap();
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let err = import_legacy_history(&db, dir.path()).await.unwrap_err();
        assert!(matches!(err, DbError::Json(_)));
        assert!(db.list_submissions().await.unwrap().is_empty());
    }

    #[test]
    fn test_parse_legacy_timestamp() {
        let naive = parse_legacy_timestamp("2024-03-02T09:30:00.123456").unwrap();
        assert_eq!(naive.to_rfc3339(), "2024-03-02T09:30:00.123456+00:00");

        let offset = parse_legacy_timestamp("2024-03-02T10:30:00+01:00").unwrap();
        assert_eq!(offset, naive - chrono::Duration::microseconds(123_456));

        assert!(parse_legacy_timestamp("yesterday").is_err());
    }
}
