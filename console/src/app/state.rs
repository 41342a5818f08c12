//! Application state management

use std::sync::Arc;

use tracing::info;

use crate::app::dashboard::Dashboard;
use crate::app::options::AppOptions;
use crate::cache::scenarios::ScenarioList;
use crate::cache::station::StationCache;
use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::notify::toast::ToastFeed;
use crate::storage::session::SessionStore;

/// Main application state
pub struct AppState {
    /// HTTP client for backend communication
    pub http_client: Arc<HttpClient>,

    /// Operator session
    pub session: Arc<SessionStore>,

    /// Station view fed by the channels
    pub station: Arc<StationCache>,

    /// Local scenario list
    pub scenarios: Arc<ScenarioList>,

    /// Operator notifications
    pub toasts: Arc<ToastFeed>,

    /// Operator actions
    pub dashboard: Arc<Dashboard>,
}

impl AppState {
    /// Initialize application state
    pub async fn init(options: &AppOptions) -> Result<Self, ConsoleError> {
        info!("Initializing application state...");

        let http_client = Arc::new(HttpClient::new(&options.backend_base_url, options.request_timeout)?);
        let session = Arc::new(SessionStore::load(options.storage.layout.session_file()).await?);
        let station = Arc::new(StationCache::new());
        let scenarios = Arc::new(ScenarioList::new());
        let toasts = Arc::new(ToastFeed::new(options.toast_capacity));

        let dashboard = Arc::new(Dashboard::new(
            http_client.clone(),
            session.clone(),
            station.clone(),
            scenarios.clone(),
            toasts.clone(),
            options.dashboard.clone(),
        ));

        Ok(Self {
            http_client,
            session,
            station,
            scenarios,
            toasts,
            dashboard,
        })
    }

    /// Shutdown application state
    pub async fn shutdown(&self) -> Result<(), ConsoleError> {
        info!("Shutting down application state...");
        self.dashboard.unmount().await;
        Ok(())
    }
}
