//! tally-server library - live election tally service
//!
//! Public results dashboard, admin tally board and CSV candidate importer on
//! top of a SQLite counter store.

use axum::Router;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use std::path::PathBuf;
use tally_common::api::AdminPassword;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;
pub mod error;
pub mod import;
pub mod overview;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Shared admin password guarding mutation endpoints
    pub admin_password: AdminPassword,
    /// CSV read by sync-file when the request names no path
    pub candidates_csv: PathBuf,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, admin_password: AdminPassword, candidates_csv: PathBuf) -> Self {
        Self {
            db,
            admin_password,
            candidates_csv,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
///
/// Overview, health and UI pages are public; every mutation requires the
/// admin password.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        .route("/api/candidates", post(api::create_candidate))
        .route("/api/candidates/import", post(api::import_csv))
        .route("/api/candidates/sync-file", post(api::sync_file))
        .route("/api/tally/increment", post(api::increment))
        .route("/api/tally/decrement", post(api::decrement))
        .route("/api/tally/reset", post(api::reset))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        .route("/api/overview", get(api::get_overview))
        .merge(api::ui_routes())
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
