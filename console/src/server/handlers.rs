//! HTTP request handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use station_api::models::TaskRequest;

use crate::cache::station::Mode;
use crate::errors::ConsoleError;
use crate::models::scenario::Scenario;
use crate::server::state::ServerState;
use crate::storage::session::Permission;
use crate::utils::version_info;

/// Error body returned by every failing handler
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ConsoleError {
    /// Status the local API answers with for this error
    pub fn http_status(&self) -> StatusCode {
        match self {
            ConsoleError::ValidationError(_) | ConsoleError::JsonError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ConsoleError::ActionDisabled(_) => StatusCode::CONFLICT,
            ConsoleError::RequestError { status, .. } if (400..500).contains(status) => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ConsoleError::RequestError { .. } | ConsoleError::HttpError(_) | ConsoleError::ConnectionError(_) => {
                StatusCode::BAD_GATEWAY
            }
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ConsoleError {
    fn into_response(self) -> Response {
        let status = self.http_status();
        (status, Json(ErrorBody { error: self.user_message() })).into_response()
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
}

/// Health check handler
pub async fn health_handler() -> impl IntoResponse {
    let version = version_info();
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "stationctl".to_string(),
        version: version.version,
    })
}

/// Version handler
pub async fn version_handler() -> impl IntoResponse {
    Json(version_info())
}

/// Dashboard snapshot handler
pub async fn dashboard_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.dashboard.snapshot().await)
}

/// Login request
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub cookie: String,
    #[serde(default)]
    pub permission: Permission,
}

/// Login handler
pub async fn login_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    state.dashboard.login(&request.cookie, request.permission).await?;
    Ok(Json(state.dashboard.snapshot().await))
}

/// Logout handler
pub async fn logout_handler(State(state): State<Arc<ServerState>>) -> Result<StatusCode, ConsoleError> {
    state.dashboard.logout().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mode request
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: Mode,
}

/// Mode handler
pub async fn mode_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<ModeRequest>,
) -> impl IntoResponse {
    state.dashboard.set_mode(request.mode);
    Json(state.dashboard.snapshot().await)
}

/// Simulated tank levels handler
pub async fn simulation_handler(
    State(state): State<Arc<ServerState>>,
    Json(levels): Json<HashMap<String, f64>>,
) -> StatusCode {
    state.dashboard.set_simulation_levels(levels);
    StatusCode::NO_CONTENT
}

/// Scenario list reload handler
pub async fn reload_scenarios_handler(
    State(state): State<Arc<ServerState>>,
) -> Result<impl IntoResponse, ConsoleError> {
    Ok(Json(state.dashboard.load_scenarios().await?))
}

/// Scenario fetch handler
pub async fn get_scenario_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ConsoleError> {
    Ok(Json(state.dashboard.fetch_scenario(&name).await?))
}

/// Scenario save handler; the path name wins over the body
pub async fn save_scenario_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
    Json(mut scenario): Json<Scenario>,
) -> Result<StatusCode, ConsoleError> {
    scenario.name = name;
    state.dashboard.save_scenario(&scenario).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub removed: usize,
}

/// Scenario delete handler
pub async fn delete_scenario_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, ConsoleError> {
    let removed = state.dashboard.delete_scenario(&name).await?;
    Ok(Json(DeleteResponse { removed }))
}

/// Scenario play handler
pub async fn play_scenario_handler(
    State(state): State<Arc<ServerState>>,
    Path(name): Path<String>,
) -> Result<StatusCode, ConsoleError> {
    state.dashboard.play_scenario(&name).await?;
    Ok(StatusCode::ACCEPTED)
}

/// Task response
#[derive(Debug, Serialize, Deserialize)]
pub struct TaskResponse {
    pub status: u16,
}

/// Task submission handler
pub async fn task_handler(
    State(state): State<Arc<ServerState>>,
    Json(task): Json<TaskRequest>,
) -> Result<impl IntoResponse, ConsoleError> {
    let status = state.dashboard.submit_task(&task).await?;
    Ok(Json(TaskResponse { status }))
}

/// Recent toasts handler
pub async fn toasts_handler(State(state): State<Arc<ServerState>>) -> impl IntoResponse {
    Json(state.toasts.recent())
}
