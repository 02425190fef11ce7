//! Plugin management handlers.

use axum::Json;
use axum::extract::{Path, State};
use tracing::info;

use agenthub_plugin::PluginError;

use crate::dto::response::{
    ApiResponse, PluginDetail, PluginListResponse, PluginSummary, ReloadAllResponse,
};
use crate::error::ApiError;
use crate::state::AppState;

/// GET /api/plugins
pub async fn list_plugins(State(state): State<AppState>) -> Json<ApiResponse<PluginListResponse>> {
    let plugins: Vec<PluginSummary> = state
        .plugins
        .list_plugins()
        .await
        .into_iter()
        .map(PluginSummary::from)
        .collect();
    let total = plugins.len();
    Json(ApiResponse::ok(PluginListResponse { plugins, total }))
}

/// GET /api/plugins/{name}
pub async fn get_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PluginDetail>>, ApiError> {
    let info = state
        .plugins
        .registry()
        .get(&name)
        .await
        .ok_or(PluginError::UnknownPlugin { name })?;

    let active_hooks = state.plugins.hook_bus().plugin_hooks(info.name()).await;
    Ok(Json(ApiResponse::ok(PluginDetail::from_info(
        info,
        active_hooks,
    ))))
}

/// POST /api/plugins/{name}/enable
pub async fn enable_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PluginSummary>>, ApiError> {
    info!(plugin = %name, "Enable requested via API");
    let info = state.plugins.enable_plugin(&name).await?;
    Ok(Json(ApiResponse::ok(info.into())))
}

/// POST /api/plugins/{name}/disable
pub async fn disable_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PluginSummary>>, ApiError> {
    info!(plugin = %name, "Disable requested via API");
    let info = state.plugins.disable_plugin(&name).await?;
    Ok(Json(ApiResponse::ok(info.into())))
}

/// POST /api/plugins/{name}/load
pub async fn load_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PluginSummary>>, ApiError> {
    info!(plugin = %name, "Load requested via API");
    let info = state.plugins.load_plugin(&name).await?;
    Ok(Json(ApiResponse::ok(info.into())))
}

/// POST /api/plugins/reload
///
/// Re-runs discovery so descriptors added since startup are picked up,
/// then batch-loads everything still in the discovered state. Per-plugin
/// failures are recorded on the registry, not surfaced here.
pub async fn reload_all(
    State(state): State<AppState>,
) -> Json<ApiResponse<ReloadAllResponse>> {
    info!("Full plugin reload requested via API");
    state.plugins.initialize().await;
    state.plugins.load_all().await;

    let registry = state.plugins.registry();
    Json(ApiResponse::ok(ReloadAllResponse {
        discovered: registry.count().await,
        enabled: registry.count_enabled().await,
    }))
}

/// POST /api/plugins/{name}/reload
pub async fn reload_plugin(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<ApiResponse<PluginSummary>>, ApiError> {
    info!(plugin = %name, "Reload requested via API");
    let info = state.plugins.reload_plugin(&name).await?;
    Ok(Json(ApiResponse::ok(info.into())))
}
