//! Application configuration options

use std::time::Duration;

use crate::app::dashboard::DashboardOptions;
use crate::errors::ConsoleError;
use crate::realtime::{channel::websocket_base_url, manager};
use crate::storage::layout::StorageLayout;
use crate::storage::settings::Settings;

/// Main application options
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Backend API base URL
    pub backend_base_url: String,

    /// Client-side HTTP timeout; `None` waits indefinitely
    pub request_timeout: Option<Duration>,

    /// Storage configuration
    pub storage: StorageOptions,

    /// Enable local HTTP server
    pub enable_socket_server: bool,

    /// Server configuration
    pub server: ServerOptions,

    /// Dashboard and subscription options
    pub dashboard: DashboardOptions,

    /// Number of toasts kept in memory
    pub toast_capacity: usize,

    /// Maximum delay for graceful shutdown
    pub max_shutdown_delay: Duration,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            backend_base_url: "http://localhost:8000".to_string(),
            request_timeout: None,
            storage: StorageOptions::default(),
            enable_socket_server: true,
            server: ServerOptions::default(),
            dashboard: DashboardOptions::default(),
            toast_capacity: 100,
            max_shutdown_delay: Duration::from_secs(30),
        }
    }
}

impl AppOptions {
    /// Build the options from the settings file
    pub fn from_settings(settings: &Settings, layout: StorageLayout) -> Result<Self, ConsoleError> {
        let socket_base = settings
            .backend
            .websocket_url
            .as_deref()
            .unwrap_or(&settings.backend.base_url);

        Ok(Self {
            backend_base_url: settings.backend.base_url.clone(),
            request_timeout: settings.backend.request_timeout_secs.map(Duration::from_secs),
            storage: StorageOptions { layout },
            enable_socket_server: settings.server.enabled,
            server: ServerOptions {
                host: settings.server.host.clone(),
                port: settings.server.port,
            },
            dashboard: DashboardOptions {
                workstation: settings.workstation.clone(),
                locale: settings.locale,
                tanks: settings.tanks.clone(),
                realtime: Some(manager::Options::new(websocket_base_url(socket_base)?)),
            },
            toast_capacity: settings.toast_capacity,
            ..Default::default()
        })
    }
}

/// Storage configuration options
#[derive(Debug, Clone, Default)]
pub struct StorageOptions {
    /// Storage layout paths
    pub layout: StorageLayout,
}

/// Local HTTP server options
#[derive(Debug, Clone)]
pub struct ServerOptions {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}
