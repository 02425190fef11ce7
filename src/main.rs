//! AgentHub Server — Agent Orchestration Host
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use agenthub_core::config::AppConfig;
use agenthub_core::error::AppError;
use agenthub_plugin::{InMemoryMasterRegistry, ModuleRegistry, PluginManager, PluginState};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("AGENTHUB_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting AgentHub v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Register compiled-in plugin modules ──────────────
    let modules = Arc::new(ModuleRegistry::new());
    plugin_task_auditor::register_modules(&modules).await;
    tracing::info!(modules = modules.count().await, "Module sources registered");

    // ── Step 2: Initialize plugin manager ────────────────────────
    tracing::info!(
        "Initializing plugin system (root: {})...",
        config.plugins.directory
    );
    let master = Arc::new(InMemoryMasterRegistry::new());
    let plugin_manager = Arc::new(PluginManager::new(
        config.plugins.directory.clone(),
        modules,
        master,
    ));

    let discovered = plugin_manager.initialize().await;
    tracing::info!(discovered = discovered, "Plugin discovery finished");

    // ── Step 3: Load and enable plugins ──────────────────────────
    if config.plugins.auto_load {
        let results = plugin_manager.load_all().await;
        let failed: Vec<&str> = results
            .values()
            .filter(|info| info.state == PluginState::Error)
            .map(|info| info.name())
            .collect();
        if failed.is_empty() {
            tracing::info!(loaded = results.len(), "All plugins enabled");
        } else {
            tracing::warn!(failed = ?failed, "Some plugins failed to load");
        }
    } else {
        tracing::info!("Plugin auto-load disabled");
    }

    // ── Step 4: Build and start HTTP server ──────────────────────
    let app_state = agenthub_api::state::AppState {
        config: Arc::new(config.clone()),
        plugins: Arc::clone(&plugin_manager),
    };

    let app = agenthub_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {}: {}", addr, e)))?;

    tracing::info!("AgentHub server listening on {}", addr);

    // ── Step 5: Graceful shutdown ────────────────────────────────
    let server = axum::serve(listener, app).with_graceful_shutdown(async move {
        shutdown_signal().await;
        tracing::info!("Shutdown signal received, starting graceful shutdown...");
    });

    server
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    // ── Step 6: Tear down the plugin system ──────────────────────
    plugin_manager.shutdown().await;

    tracing::info!("AgentHub server shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
