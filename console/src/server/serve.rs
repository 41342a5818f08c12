//! HTTP server setup

use std::future::Future;
use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::options::ServerOptions;
use crate::errors::ConsoleError;
use crate::server::handlers::{
    dashboard_handler, delete_scenario_handler, get_scenario_handler, health_handler, login_handler,
    logout_handler, mode_handler, play_scenario_handler, reload_scenarios_handler, save_scenario_handler,
    simulation_handler, task_handler, toasts_handler, version_handler,
};
use crate::server::state::ServerState;

/// Build the local console API
pub fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        // Health and version
        .route("/health", get(health_handler))
        .route("/version", get(version_handler))
        // Dashboard
        .route("/dashboard", get(dashboard_handler))
        .route("/session", post(login_handler).delete(logout_handler))
        .route("/mode", put(mode_handler))
        .route("/simulation", put(simulation_handler))
        // Scenarios
        .route("/scenarios", post(reload_scenarios_handler))
        .route(
            "/scenarios/{name}",
            get(get_scenario_handler)
                .put(save_scenario_handler)
                .delete(delete_scenario_handler),
        )
        .route("/scenarios/{name}/play", post(play_scenario_handler))
        // Tasks and notifications
        .route("/tasks", post(task_handler))
        .route("/toasts", get(toasts_handler))
        // State and middleware
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server
pub async fn serve(
    options: &ServerOptions,
    state: Arc<ServerState>,
    shutdown_signal: impl Future<Output = ()> + Send + 'static,
) -> Result<JoinHandle<Result<(), ConsoleError>>, ConsoleError> {
    let app = router(state);

    let addr = format!("{}:{}", options.host, options.port);
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| ConsoleError::ServerError(e.to_string()))?;

    let handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal)
            .await
            .map_err(|e| ConsoleError::ServerError(e.to_string()))
    });

    Ok(handle)
}
