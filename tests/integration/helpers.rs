//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use agenthub_core::config::AppConfig;
use agenthub_plugin::{InMemoryMasterRegistry, ModuleRegistry, PluginManager};

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// The plugin manager behind the router
    pub plugins: Arc<PluginManager>,
    /// The host capability registry
    pub master: Arc<InMemoryMasterRegistry>,
    _root: tempfile::TempDir,
}

/// Response from a test request
pub struct TestResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Parsed JSON body (Null when the body was not JSON)
    pub body: Value,
}

impl TestApp {
    /// Create a new test application with the task-auditor plugin
    /// installed in a temporary plugin root.
    pub async fn new() -> Self {
        let root = tempfile::tempdir().expect("Failed to create plugin root");
        let plugin_dir = root.path().join("task-auditor");
        std::fs::create_dir(&plugin_dir).expect("Failed to create plugin dir");
        let descriptor = std::fs::read_to_string("plugins/task-auditor/plugin.json")
            .expect("Failed to read task-auditor descriptor");
        std::fs::write(plugin_dir.join("plugin.json"), descriptor)
            .expect("Failed to write descriptor");

        let modules = Arc::new(ModuleRegistry::new());
        plugin_task_auditor::register_modules(&modules).await;

        let master = Arc::new(InMemoryMasterRegistry::new());
        let plugins = Arc::new(PluginManager::new(root.path(), modules, master.clone()));
        plugins.initialize().await;

        let state = agenthub_api::state::AppState {
            config: Arc::new(AppConfig::default()),
            plugins: plugins.clone(),
        };
        let router = agenthub_api::router::build_router(state);

        Self {
            router,
            plugins,
            master,
            _root: root,
        }
    }

    /// Send a request to the test router and parse the JSON response.
    pub async fn request(&self, method: &str, path: &str, body: Option<Value>) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}
