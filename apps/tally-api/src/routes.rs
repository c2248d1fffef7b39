//! HTTP routes.
//!
//! ```text
//! GET    /                                  liveness message
//! GET    /api/health                        store health
//! POST   /api/upload                        multipart "files" parts
//! GET    /api/history                       newest first
//! GET    /api/history/{id}
//! DELETE /api/history/{id}
//! GET    /api/file/{file_id}/output         text/plain
//! GET    /api/file/{file_id}/error          text/plain
//! GET    /api/download/{file_id}/{type}     attachment, type ∈ {output, error}
//! ```

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{ApiError, ApiResult};
use crate::services::ingestion::{self, UploadedFile};
use crate::services::retrieval;
use crate::AppState;
use tally_core::{ArtifactKind, SubmissionEntry};

/// Multipart field name carrying uploaded files.
pub const UPLOAD_FIELD: &str = "files";

const FALLBACK_FILENAME: &str = "upload.txt";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/", get(root))
        .route("/api/health", get(health))
        .route("/api/upload", post(upload))
        .route("/api/history", get(list_history))
        .route("/api/history/{id}", get(get_submission).delete(delete_submission))
        .route("/api/file/{file_id}/output", get(output_file))
        .route("/api/file/{file_id}/error", get(error_file))
        .route("/api/download/{file_id}/{kind}", get(download))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({ "message": "Order Processing API is running" }))
}

async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = state.store.is_healthy().await;
    Json(json!({ "status": "ok", "database": database }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::InvalidRequest(err.body_text())
    }
}

async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<SubmissionEntry>> {
    let mut multipart = multipart.map_err(|rej| ApiError::InvalidRequest(rej.body_text()))?;

    let mut uploads = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .unwrap_or(FALLBACK_FILENAME)
            .to_string();
        let bytes = field.bytes().await.map_err(multipart_error)?;
        uploads.push(UploadedFile::new(filename, bytes.to_vec()));
    }

    let entry = ingestion::ingest(state.store.as_ref(), uploads).await?;
    Ok(Json(entry))
}

async fn list_history(State(state): State<AppState>) -> ApiResult<Json<Vec<SubmissionEntry>>> {
    Ok(Json(retrieval::history(state.store.as_ref()).await?))
}

async fn get_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubmissionEntry>> {
    Ok(Json(retrieval::submission(state.store.as_ref(), &id).await?))
}

async fn delete_submission(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    retrieval::delete(state.store.as_ref(), &id).await?;
    Ok(Json(json!({ "message": "Submission deleted successfully" })))
}

async fn output_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ApiResult<String> {
    let artifact = retrieval::artifact(state.store.as_ref(), &file_id, ArtifactKind::Output).await?;
    Ok(artifact.content)
}

async fn error_file(
    State(state): State<AppState>,
    Path(file_id): Path<String>,
) -> ApiResult<String> {
    let artifact = retrieval::artifact(state.store.as_ref(), &file_id, ArtifactKind::Error).await?;
    Ok(artifact.content)
}

async fn download(
    State(state): State<AppState>,
    Path((file_id, kind)): Path<(String, String)>,
) -> ApiResult<Response> {
    let kind = retrieval::download_kind(&kind)?;
    let artifact = retrieval::artifact(state.store.as_ref(), &file_id, kind)
        .await
        .map_err(|err| match err {
            ApiError::NotFound(_) => ApiError::NotFound("File not found".to_string()),
            other => other,
        })?;

    let disposition = format!("attachment; filename=\"{}\"", artifact.name.replace('"', ""));

    Ok((
        [
            (header::CONTENT_TYPE, TEXT_PLAIN.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        artifact.content,
    )
        .into_response())
}
