// Integration tests: HTTP endpoints against the router

use axum_test::TestServer;
use dockboard::models::{
    ContainerMetrics, GroupMetrics, Snapshot, SystemMetrics, shared_snapshot,
};
use dockboard::name_store::NameStore;
use dockboard::routes;
use std::sync::Arc;
use tempfile::TempDir;

async fn test_app(dir: &TempDir) -> (axum::Router, dockboard::models::SharedSnapshot, Arc<NameStore>) {
    let path = dir.path().join("groups.db");
    let store = NameStore::connect(path.to_str().unwrap()).await.unwrap();
    store.init().await.unwrap();
    let store = Arc::new(store);
    let snapshot = shared_snapshot();
    let app = routes::app(snapshot.clone(), store.clone());
    (app, snapshot, store)
}

fn populated_snapshot() -> Snapshot {
    let mut snap = Snapshot::default();
    snap.stats.insert(
        "app-web".to_string(),
        ContainerMetrics {
            cpu_percent: 10.0,
            cpu_limit: Some(2.0),
            memory_percent: 50.0,
            memory_usage_mb: 512.0,
            memory_limit_mb: None,
        },
    );
    snap.groups.insert(
        "web".to_string(),
        GroupMetrics {
            containers: vec!["app-web".to_string()],
            total_cpu: 10.0,
            total_memory_mb: 512.0,
            original_name: "web".to_string(),
        },
    );
    snap.system_stats = SystemMetrics {
        cpu_percent: 25.0,
        ram_percent: 60.0,
        total_ram: 16.0,
        docker_cpu_percent: 10.0,
        docker_ram_percent: 3.13,
    };
    snap
}

#[tokio::test]
async fn test_api_stats_default_shape() {
    let dir = TempDir::new().unwrap();
    let (app, _, _) = test_app(&dir).await;
    let server = TestServer::new(app);

    let response = server.get("/api/stats").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json["stats"].as_object().unwrap().is_empty());
    assert!(json["groups"].as_object().unwrap().is_empty());
    assert_eq!(json["system_stats"]["cpu_percent"], 0.0);
    assert_eq!(json["system_stats"]["total_ram"], 0.0);
}

#[tokio::test]
async fn test_api_stats_serves_published_snapshot() {
    let dir = TempDir::new().unwrap();
    let (app, shared, _) = test_app(&dir).await;
    *shared.write().await = Arc::new(populated_snapshot());
    let server = TestServer::new(app);

    let response = server.get("/api/stats").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["stats"]["app-web"]["cpu_percent"], 10.0);
    assert_eq!(json["stats"]["app-web"]["memory_limit_mb"], serde_json::Value::Null);
    assert_eq!(json["groups"]["web"]["original_name"], "web");
    assert_eq!(json["groups"]["web"]["containers"][0], "app-web");
    assert_eq!(json["system_stats"]["docker_cpu_percent"], 10.0);
}

#[tokio::test]
async fn test_rename_group_persists() {
    let dir = TempDir::new().unwrap();
    let (app, _, store) = test_app(&dir).await;
    let server = TestServer::new(app);

    let response = server
        .post("/api/rename-group")
        .json(&serde_json::json!({ "old_name": "web", "new_name": "frontend" }))
        .await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json["success"], true);
    assert_eq!(store.resolve("web").await, "frontend");
}

#[tokio::test]
async fn test_rename_group_accepts_empty_new_name() {
    let dir = TempDir::new().unwrap();
    let (app, _, store) = test_app(&dir).await;
    let server = TestServer::new(app);

    let response = server
        .post("/api/rename-group")
        .json(&serde_json::json!({ "old_name": "web", "new_name": "" }))
        .await;
    response.assert_status_ok();
    // Empty stored name resolves back to the original key.
    assert_eq!(store.resolve("web").await, "web");
}

#[tokio::test]
async fn test_index_renders_snapshot_html() {
    let dir = TempDir::new().unwrap();
    let (app, shared, _) = test_app(&dir).await;
    *shared.write().await = Arc::new(populated_snapshot());
    let server = TestServer::new(app);

    let response = server.get("/").await;
    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("app-web"));
    assert!(body.contains("web"));
    assert!(body.contains("512.00"));
}

#[tokio::test]
async fn test_version_endpoint() {
    let dir = TempDir::new().unwrap();
    let (app, _, _) = test_app(&dir).await;
    let server = TestServer::new(app);

    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("dockboard"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}
