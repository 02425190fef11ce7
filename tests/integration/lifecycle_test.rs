//! Integration tests for the plugin lifecycle and hook dispatch.

use std::collections::HashMap;

use serde_json::json;

use agenthub_plugin::HookEvent;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_enable_registers_with_host() {
    let app = TestApp::new().await;
    app.plugins.load_plugin("task-auditor").await.expect("load");
    app.plugins
        .enable_plugin("task-auditor")
        .await
        .expect("enable");

    assert_eq!(app.master.agent_names().await, vec!["task-auditor"]);
    assert_eq!(
        app.master.keywords_for("task-auditor").await,
        vec![
            "audit".to_string(),
            "history".to_string(),
            "outcomes".to_string()
        ]
    );
    assert_eq!(app.plugins.hook_bus().total_handlers().await, 2);
}

#[tokio::test]
async fn test_task_events_reach_hook_handlers() {
    let app = TestApp::new().await;
    app.plugins.load_plugin("task-auditor").await.expect("load");
    app.plugins
        .enable_plugin("task-auditor")
        .await
        .expect("enable");

    let data = HashMap::from([
        ("task_id".to_string(), json!("t-1")),
        ("agent".to_string(), json!("triage")),
        ("result".to_string(), json!({"items": 2})),
    ]);
    let failed = app
        .plugins
        .dispatcher()
        .emit(HookEvent::TaskCompleted, data)
        .await;
    assert!(failed.is_empty());

    let failed = app
        .plugins
        .dispatcher()
        .emit(HookEvent::TaskFailed, HashMap::new())
        .await;
    assert!(failed.is_empty());

    // Events with no registrations are a no-op.
    let failed = app
        .plugins
        .dispatcher()
        .emit(HookEvent::DecisionMade, HashMap::new())
        .await;
    assert!(failed.is_empty());
}

#[tokio::test]
async fn test_disable_withdraws_registrations() {
    let app = TestApp::new().await;
    app.plugins.load_plugin("task-auditor").await.expect("load");
    app.plugins
        .enable_plugin("task-auditor")
        .await
        .expect("enable");
    app.plugins
        .disable_plugin("task-auditor")
        .await
        .expect("disable");

    assert_eq!(app.master.agent_count().await, 0);
    assert_eq!(app.plugins.hook_bus().total_handlers().await, 0);
}

#[tokio::test]
async fn test_load_all_enables_everything() {
    let app = TestApp::new().await;
    let results = app.plugins.load_all().await;
    assert_eq!(results.len(), 1);
    assert_eq!(app.plugins.registry().count_enabled().await, 1);
}

#[tokio::test]
async fn test_shutdown_clears_host_state() {
    let app = TestApp::new().await;
    app.plugins.load_all().await;

    app.plugins.shutdown().await;
    assert_eq!(app.plugins.registry().count_enabled().await, 0);
    assert_eq!(app.plugins.hook_bus().total_handlers().await, 0);
    assert_eq!(app.master.agent_count().await, 0);
}
