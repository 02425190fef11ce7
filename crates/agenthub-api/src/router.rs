//! Route definitions for the AgentHub HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via
//! Axum's `State` extractor.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new().merge(plugin_routes()).merge(health_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Plugin management endpoints
fn plugin_routes() -> Router<AppState> {
    Router::new()
        .route("/plugins", get(handlers::plugin::list_plugins))
        .route("/plugins/reload", post(handlers::plugin::reload_all))
        .route("/plugins/{name}", get(handlers::plugin::get_plugin))
        .route("/plugins/{name}/load", post(handlers::plugin::load_plugin))
        .route(
            "/plugins/{name}/enable",
            post(handlers::plugin::enable_plugin),
        )
        .route(
            "/plugins/{name}/disable",
            post(handlers::plugin::disable_plugin),
        )
        .route(
            "/plugins/{name}/reload",
            post(handlers::plugin::reload_plugin),
        )
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
