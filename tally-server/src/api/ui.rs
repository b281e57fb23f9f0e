//! UI serving routes
//!
//! Serves the embedded results dashboard and admin tally board

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};

use crate::AppState;

const RESULTS_HTML: &str = include_str!("../ui/results.html");
const RESULTS_JS: &str = include_str!("../ui/results.js");
const TALLY_HTML: &str = include_str!("../ui/tally.html");
const TALLY_JS: &str = include_str!("../ui/tally.js");
const STYLE_CSS: &str = include_str!("../ui/style.css");

/// GET /
///
/// Public results dashboard
pub async fn serve_results() -> Html<&'static str> {
    Html(RESULTS_HTML)
}

/// GET /tally
///
/// Admin tally board. The page itself is public; its actions need the password.
pub async fn serve_tally() -> Html<&'static str> {
    Html(TALLY_HTML)
}

pub async fn serve_results_js() -> Response {
    asset("application/javascript", RESULTS_JS)
}

pub async fn serve_tally_js() -> Response {
    asset("application/javascript", TALLY_JS)
}

pub async fn serve_style_css() -> Response {
    asset("text/css", STYLE_CSS)
}

fn asset(content_type: &'static str, body: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            ("content-type", content_type),
            ("cache-control", "no-cache, no-store, must-revalidate"),
        ],
        body,
    )
        .into_response()
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(serve_results))
        .route("/tally", get(serve_tally))
        .route("/static/results.js", get(serve_results_js))
        .route("/static/tally.js", get(serve_tally_js))
        .route("/static/style.css", get(serve_style_css))
}
