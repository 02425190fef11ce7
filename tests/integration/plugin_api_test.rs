//! Integration tests for the plugin management API.

use http::StatusCode;
use serde_json::Value;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_health_reports_plugin_counts() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
    assert_eq!(response.body["data"]["plugins"], 1);
    assert_eq!(response.body["data"]["plugins_enabled"], 0);
}

#[tokio::test]
async fn test_list_shows_discovered_plugin() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/plugins", None).await;
    assert_eq!(response.status, StatusCode::OK);

    assert_eq!(response.body["data"]["total"], 1);
    let plugins = response.body["data"]["plugins"].as_array().expect("array");
    assert_eq!(plugins.len(), 1);
    assert_eq!(plugins[0]["name"], "task-auditor");
    assert_eq!(plugins[0]["state"], "discovered");
}

#[tokio::test]
async fn test_reload_all_discovers_and_enables() {
    let app = TestApp::new().await;

    let response = app.request("POST", "/api/plugins/reload", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["discovered"], 1);
    assert_eq!(response.body["data"]["enabled"], 1);

    let response = app.request("GET", "/api/plugins/task-auditor", None).await;
    assert_eq!(response.body["data"]["state"], "enabled");
}

#[tokio::test]
async fn test_unknown_plugin_is_404() {
    let app = TestApp::new().await;

    let response = app.request("GET", "/api/plugins/ghost", None).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_enable_before_load_is_conflict() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/plugins/task-auditor/enable", None)
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    let message = response.body["message"].as_str().expect("message");
    assert!(message.contains("discovered"));
}

#[tokio::test]
async fn test_full_lifecycle_over_http() {
    let app = TestApp::new().await;

    let response = app
        .request("POST", "/api/plugins/task-auditor/load", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "loaded");

    let response = app
        .request("POST", "/api/plugins/task-auditor/enable", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "enabled");

    // Detail view shows declared components and live hook registrations.
    let response = app.request("GET", "/api/plugins/task-auditor", None).await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["agents"], 1);
    assert_eq!(data["tools"], 1);
    assert_eq!(data["active_hooks"]["task_completed"], 1);
    assert_eq!(data["active_hooks"]["task_failed"], 1);
    assert_eq!(data["config"]["max_records"], 1000);

    let response = app
        .request("POST", "/api/plugins/task-auditor/disable", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "disabled");

    // Hooks are gone once disabled.
    let response = app.request("GET", "/api/plugins/task-auditor", None).await;
    assert_eq!(
        response.body["data"]["active_hooks"],
        Value::Object(Default::default())
    );
}

#[tokio::test]
async fn test_reload_over_http() {
    let app = TestApp::new().await;
    app.request("POST", "/api/plugins/task-auditor/load", None)
        .await;
    app.request("POST", "/api/plugins/task-auditor/enable", None)
        .await;

    let response = app
        .request("POST", "/api/plugins/task-auditor/reload", None)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["state"], "enabled");
}
