//! CSV import over HTTP: inline upload and sync-file

mod helpers;

use std::collections::BTreeSet;

use axum::http::StatusCode;
use helpers::{extract_json, position_candidates, TestApp};
use serde_json::json;

async fn candidate_set(app: &TestApp) -> BTreeSet<(String, String, String)> {
    sqlx::query_as::<_, (String, String, String)>("SELECT position_key, name, class FROM candidates")
        .fetch_all(&app.pool)
        .await
        .unwrap()
        .into_iter()
        .collect()
}

fn triple(position_key: &str, name: &str, class: &str) -> (String, String, String) {
    (position_key.to_string(), name.to_string(), class.to_string())
}

#[tokio::test]
async fn test_import_defaults_to_merge() {
    let app = TestApp::new().await;
    app.add_candidate("president", "Anna", "12b").await;

    let response = app
        .admin_post(
            "/api/candidates/import",
            json!({"csv": "name,class,position_key\nJanis,10c,min_tech\nbroken line\n"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["mode"], "merge");
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["deleted"], 0);
    assert_eq!(body["totalCsvRows"], 1);
    assert_eq!(body["skipped"], json!([{"line": 3, "reason": "name, class and position_key are required"}]));

    assert_eq!(candidate_set(&app).await.len(), 2);
}

#[tokio::test]
async fn test_import_replace_keeps_survivor_counts() {
    let app = TestApp::new().await;
    let anna = app.add_candidate("president", "Anna", "12b").await;
    app.add_candidate("min_art", "Liga", "11a").await;
    app.admin_post("/api/tally/increment", json!({"candidateId": anna}))
        .await;

    let response = app
        .admin_post(
            "/api/candidates/import",
            json!({"csv": "Anna,12b,president\nPeteris,9a,min_media\n", "mode": "replace"}),
        )
        .await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["deleted"], 1);

    assert_eq!(
        candidate_set(&app).await,
        BTreeSet::from([
            triple("president", "Anna", "12b"),
            triple("min_media", "Peteris", "9a"),
        ])
    );

    let overview = app.overview().await;
    assert_eq!(
        position_candidates(&overview, "president"),
        vec![("Anna".to_string(), "12b".to_string(), 1)]
    );
}

#[tokio::test]
async fn test_import_requires_csv() {
    let app = TestApp::new().await;

    for body in [json!({}), json!({"csv": ""}), json!({"csv": "   \n"})] {
        let response = app.admin_post("/api/candidates/import", body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(extract_json(response.into_body()).await["error"], "csv required");
    }
}

#[tokio::test]
async fn test_import_unknown_mode_rejected() {
    let app = TestApp::new().await;
    let response = app
        .admin_post(
            "/api/candidates/import",
            json!({"csv": "Anna,12b,president\n", "mode": "overwrite"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(candidate_set(&app).await.is_empty());
}

#[tokio::test]
async fn test_import_unknown_position_writes_nothing() {
    let app = TestApp::new().await;
    let response = app
        .admin_post(
            "/api/candidates/import",
            json!({"csv": "Anna,12b,president\nLiga,11a,min_sport\n"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().contains("min_sport"));
    assert!(candidate_set(&app).await.is_empty());
}

#[tokio::test]
async fn test_sync_file_default_path() {
    let app = TestApp::new().await;
    std::fs::write(app.csv_path(), "Anna,12b,president\nJanis,10c,min_tech\n").unwrap();

    let response = app.admin_post("/api/candidates/sync-file", json!({})).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["ok"], true);
    assert_eq!(body["inserted"], 2);
    assert_eq!(body["source"], app.csv_path().display().to_string());
}

#[tokio::test]
async fn test_sync_file_explicit_path_replace() {
    let app = TestApp::new().await;
    app.add_candidate("president", "Anna", "12b").await;

    let path = app.dir.path().join("other.csv");
    std::fs::write(&path, "Janis,10c,min_tech\n").unwrap();

    let response = app
        .admin_post(
            "/api/candidates/sync-file",
            json!({"path": path, "mode": "replace"}),
        )
        .await;
    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "replace");
    assert_eq!(body["deleted"], 1);
    assert_eq!(
        candidate_set(&app).await,
        BTreeSet::from([triple("min_tech", "Janis", "10c")])
    );
}

#[tokio::test]
async fn test_sync_file_missing_file() {
    let app = TestApp::new().await;
    let response = app.admin_post("/api/candidates/sync-file", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = extract_json(response.into_body()).await;
    assert!(body["error"].as_str().unwrap().starts_with("file not found"));
}

#[tokio::test]
async fn test_sync_file_without_body_uses_default_file() {
    let app = TestApp::new().await;
    std::fs::write(app.csv_path(), "Anna,12b,president\n").unwrap();

    let response = app.admin_post_empty("/api/candidates/sync-file").await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = extract_json(response.into_body()).await;
    assert_eq!(body["mode"], "merge");
    assert_eq!(body["inserted"], 1);
    assert_eq!(body["source"], app.csv_path().display().to_string());
    assert_eq!(
        candidate_set(&app).await,
        BTreeSet::from([triple("president", "Anna", "12b")])
    );
}
