//! Public overview endpoint polled by both UI pages

use axum::{extract::State, Json};

use crate::overview::{load_overview, Overview};
use crate::{ApiResult, AppState};

/// GET /api/overview
pub async fn get_overview(State(state): State<AppState>) -> ApiResult<Json<Overview>> {
    let overview = load_overview(&state.db).await?;
    Ok(Json(overview))
}
