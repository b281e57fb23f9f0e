//! Shared helpers for tally-server integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tally_common::api::AdminPassword;
use tally_common::db::init_database;
use tally_server::{build_router, AppState};
use tempfile::TempDir;
use tower::util::ServiceExt; // for `oneshot`

pub const TEST_PASS: &str = "test-pass";

/// Test app on a fresh seeded database
///
/// Keep the `TempDir` alive for the duration of the test.
pub struct TestApp {
    pub dir: TempDir,
    pub pool: SqlitePool,
    pub router: Router,
}

impl TestApp {
    pub async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let pool = init_database(&dir.path().join("elections.db")).await.unwrap();
        let state = AppState::new(
            pool.clone(),
            AdminPassword::new(TEST_PASS),
            dir.path().join("candidates.csv"),
        );
        Self {
            router: build_router(state),
            dir,
            pool,
        }
    }

    pub fn csv_path(&self) -> PathBuf {
        self.dir.path().join("candidates.csv")
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    /// POST JSON with the admin password header
    pub async fn admin_post(&self, uri: &str, body: Value) -> Response<Body> {
        self.send(json_request(uri, body, Some(TEST_PASS))).await
    }

    /// POST with the admin password header and no body at all
    pub async fn admin_post_empty(&self, uri: &str) -> Response<Body> {
        self.send(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("x-admin-pass", TEST_PASS)
                .body(Body::empty())
                .unwrap(),
        )
        .await
    }

    pub async fn overview(&self) -> Value {
        extract_json(self.get("/api/overview").await.into_body()).await
    }

    /// Create a candidate over HTTP and return its id
    pub async fn add_candidate(&self, position_key: &str, name: &str, class: &str) -> i64 {
        let response = self
            .admin_post(
                "/api/candidates",
                serde_json::json!({"position_key": position_key, "name": name, "class": class}),
            )
            .await;
        let body = extract_json(response.into_body()).await;
        body["id"].as_i64().unwrap()
    }
}

pub fn json_request(uri: &str, body: Value, password: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(password) = password {
        builder = builder.header("x-admin-pass", password);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

/// Candidates of one position as (name, class, count), in overview order
pub fn position_candidates(overview: &Value, key: &str) -> Vec<(String, String, i64)> {
    overview["positions"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["key"] == key)
        .unwrap()["candidates"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| {
            (
                c["name"].as_str().unwrap().to_string(),
                c["class"].as_str().unwrap().to_string(),
                c["count"].as_i64().unwrap(),
            )
        })
        .collect()
}
