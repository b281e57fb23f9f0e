//! Candidate creation and CSV import endpoints

use std::path::PathBuf;

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tally_common::db::Candidate;
use tracing::info;

use super::extract::OptionalJson;
use crate::db::candidates::insert_candidate;
use crate::import::{import_csv_text, ImportMode, ImportSummary};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct CreateCandidateRequest {
    pub position_key: Option<String>,
    pub name: Option<String>,
    pub class: Option<String>,
}

/// POST /api/candidates
///
/// Adds one candidate with a zero tally.
pub async fn create_candidate(
    State(state): State<AppState>,
    payload: Result<Json<CreateCandidateRequest>, JsonRejection>,
) -> ApiResult<Json<Candidate>> {
    let Json(req) = payload?;

    let (position_key, name, class) = match (
        non_blank(req.position_key),
        non_blank(req.name),
        non_blank(req.class),
    ) {
        (Some(p), Some(n), Some(c)) => (p, n, c),
        _ => {
            return Err(ApiError::BadRequest(
                "position_key, name, class required".to_string(),
            ))
        }
    };

    let candidate = insert_candidate(&state.db, &position_key, &name, &class).await?;
    Ok(Json(candidate))
}

#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub csv: Option<String>,
    #[serde(default)]
    pub mode: ImportMode,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

/// POST /api/candidates/import
///
/// Reconciles the candidate table with CSV text from the request body.
pub async fn import_csv(
    State(state): State<AppState>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Json<ImportResponse>> {
    let Json(req) = payload?;

    let csv = match req.csv {
        Some(csv) if !csv.trim().is_empty() => csv,
        _ => return Err(ApiError::BadRequest("csv required".to_string())),
    };

    let summary = import_csv_text(&state.db, &csv, req.mode).await?;
    Ok(Json(ImportResponse { ok: true, summary }))
}

#[derive(Debug, Default, Deserialize)]
pub struct SyncFileRequest {
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub mode: ImportMode,
}

#[derive(Debug, Serialize)]
pub struct SyncFileResponse {
    pub ok: bool,
    pub source: String,
    #[serde(flatten)]
    pub summary: ImportSummary,
}

/// POST /api/candidates/sync-file
///
/// Same reconciliation as `import_csv`, reading the CSV from disk. Without a
/// `path` (or without a body) the configured candidates file is used.
pub async fn sync_file(
    State(state): State<AppState>,
    OptionalJson(req): OptionalJson<SyncFileRequest>,
) -> ApiResult<Json<SyncFileResponse>> {
    let source = req.path.unwrap_or_else(|| state.candidates_csv.clone());
    if !source.is_file() {
        return Err(ApiError::BadRequest(format!(
            "file not found: {}",
            source.display()
        )));
    }

    let text = tokio::fs::read_to_string(&source).await?;
    info!(source = %source.display(), mode = %req.mode, "Syncing candidates from file");

    let summary = import_csv_text(&state.db, &text, req.mode).await?;
    Ok(Json(SyncFileResponse {
        ok: true,
        source: source.display().to_string(),
        summary,
    }))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
