//! Admin password middleware
//!
//! Accepts the shared password from the `x-admin-pass` header or the `admin`
//! query parameter. An empty header falls through to the query parameter.
//! Applied to mutation routes only; the overview, health and UI routes stay
//! public.

use axum::{
    extract::{Query, Request, State},
    middleware::Next,
    response::Response,
};
use serde::Deserialize;
use tally_common::api::{ADMIN_PASS_HEADER, ADMIN_PASS_QUERY};
use tracing::warn;

use crate::{ApiError, AppState};

#[derive(Debug, Default, Deserialize)]
struct AdminQuery {
    admin: Option<String>,
}

/// Reject requests without the admin password with 401
pub async fn auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let provided = match request
        .headers()
        .get(ADMIN_PASS_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
    {
        Some(header) => Some(header.to_string()),
        None => Query::<AdminQuery>::try_from_uri(request.uri())
            .ok()
            .and_then(|Query(q)| q.admin),
    };

    match provided {
        Some(password) if state.admin_password.verify(&password) => Ok(next.run(request).await),
        Some(_) => {
            warn!(path = %request.uri().path(), "Rejected admin request: wrong password");
            Err(ApiError::Unauthorized)
        }
        None => {
            warn!(
                path = %request.uri().path(),
                "Rejected admin request: no {} header or '{}' query parameter",
                ADMIN_PASS_HEADER,
                ADMIN_PASS_QUERY
            );
            Err(ApiError::Unauthorized)
        }
    }
}
