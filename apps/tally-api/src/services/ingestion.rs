//! Upload ingestion: process each file and record the submission.
//!
//! ```text
//! uploads ──► UTF-8 check ──► tally_core::run ──► artifacts ──► record_submission
//!                                                  upload         (one transaction)
//!                                                  output
//!                                                  error
//! ```

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use tally_core::{ArtifactKind, SubmissionEntry, SubmissionFile};
use tally_db::{NewArtifact, SubmissionStore};

/// A file as received from the client.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        UploadedFile {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }
}

/// Runs one file's content through the pipeline; returns `(report, error_log)`.
fn process_content(file_id: &str, content: &str) -> (String, String) {
    let run = tally_core::run(content);
    match &run {
        Some(run) => info!(
            file_id = %file_id,
            lines = run.lines_read,
            rejected = run.errors.len(),
            customers = run.result.summary_report().len(),
            "File processed"
        ),
        None => info!(file_id = %file_id, "File is empty"),
    }
    tally_core::outcome(run.as_ref())
}

/// Processes every upload and records them as one submission.
///
/// ## Errors
/// - `InvalidRequest` when `uploads` is empty or a file is not UTF-8 text;
///   nothing is recorded in that case
/// - `Storage` when the submission cannot be written
pub async fn ingest(
    store: &dyn SubmissionStore,
    uploads: Vec<UploadedFile>,
) -> ApiResult<SubmissionEntry> {
    if uploads.is_empty() {
        return Err(ApiError::InvalidRequest("No files uploaded".to_string()));
    }

    let mut files = Vec::with_capacity(uploads.len());
    let mut artifacts = Vec::with_capacity(uploads.len() * 3);

    for upload in uploads {
        let content = String::from_utf8(upload.bytes).map_err(|_| {
            ApiError::InvalidRequest(format!("File '{}' is not valid UTF-8 text", upload.filename))
        })?;

        let file = SubmissionFile::new(Uuid::new_v4().to_string(), upload.filename);
        debug!(file_id = %file.id, filename = %file.filename, bytes = content.len(), "Processing upload");

        let (output, errors) = process_content(&file.id, &content);

        artifacts.push(NewArtifact::new(
            &file.id,
            ArtifactKind::Upload,
            file.artifact_name(ArtifactKind::Upload),
            content,
        ));
        artifacts.push(NewArtifact::new(&file.id, ArtifactKind::Output, &file.output_file, output));
        artifacts.push(NewArtifact::new(&file.id, ArtifactKind::Error, &file.error_file, errors));
        files.push(file);
    }

    let entry = SubmissionEntry {
        id: Uuid::new_v4().to_string(),
        timestamp: Utc::now(),
        files,
    };

    store.record_submission(&entry, &artifacts).await?;

    info!(submission_id = %entry.id, files = entry.files.len(), "Submission recorded");
    Ok(entry)
}
