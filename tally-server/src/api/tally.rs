//! Tally mutation endpoints

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::extract::OptionalJson;
use crate::db::tallies;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyRequest {
    pub candidate_id: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TallyResponse {
    pub candidate_id: i64,
    pub count: i64,
}

/// POST /api/tally/increment
pub async fn increment(
    State(state): State<AppState>,
    payload: Result<Json<TallyRequest>, JsonRejection>,
) -> ApiResult<Json<TallyResponse>> {
    let candidate_id = candidate_id(payload)?;
    let count = tallies::increment(&state.db, candidate_id).await?;
    debug!(candidate_id, count, "Incremented tally");
    Ok(Json(TallyResponse { candidate_id, count }))
}

/// POST /api/tally/decrement
///
/// Counts never drop below zero.
pub async fn decrement(
    State(state): State<AppState>,
    payload: Result<Json<TallyRequest>, JsonRejection>,
) -> ApiResult<Json<TallyResponse>> {
    let candidate_id = candidate_id(payload)?;
    let count = tallies::decrement(&state.db, candidate_id).await?;
    debug!(candidate_id, count, "Decremented tally");
    Ok(Json(TallyResponse { candidate_id, count }))
}

fn candidate_id(payload: Result<Json<TallyRequest>, JsonRejection>) -> ApiResult<i64> {
    let Json(req) = payload?;
    match req.candidate_id {
        Some(id) if id > 0 => Ok(id),
        _ => Err(ApiError::BadRequest("candidateId required".to_string())),
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ResetRequest {
    pub position_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ResetResponse {
    pub ok: bool,
    /// Tally rows zeroed
    pub reset: u64,
}

/// POST /api/tally/reset
///
/// Zeroes one position's tallies when `position_key` is given, otherwise all.
/// The body is optional.
pub async fn reset(
    State(state): State<AppState>,
    OptionalJson(req): OptionalJson<ResetRequest>,
) -> ApiResult<Json<ResetResponse>> {
    let reset = match req.position_key.as_deref().map(str::trim) {
        Some(key) if !key.is_empty() => {
            let n = tallies::reset_position(&state.db, key).await?;
            info!(position_key = key, rows = n, "Reset position tallies");
            n
        }
        _ => {
            let n = tallies::reset_all(&state.db).await?;
            info!(rows = n, "Reset all tallies");
            n
        }
    };

    Ok(Json(ResetResponse { ok: true, reset }))
}
