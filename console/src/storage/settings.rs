//! Settings file management

use serde::{Deserialize, Serialize};

use crate::logs::LogLevel;
use crate::notify::messages::Locale;

/// Console settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Emit logs as JSON
    #[serde(default)]
    pub log_json: bool,

    /// Also write daily-rolling log files under the config directory
    #[serde(default)]
    pub log_to_file: bool,

    /// Backend configuration
    #[serde(default)]
    pub backend: BackendSettings,

    /// Operator terminal identity used for subscriptions and commands
    #[serde(default = "default_workstation")]
    pub workstation: String,

    /// Language of operator messages
    #[serde(default)]
    pub locale: Locale,

    /// Local console API
    #[serde(default)]
    pub server: ServerSettings,

    /// Tanks shown in the measurements table, in display order
    #[serde(default = "default_tanks")]
    pub tanks: Vec<TankSettings>,

    /// Number of toasts kept for the dashboard
    #[serde(default = "default_toast_capacity")]
    pub toast_capacity: usize,
}

fn default_true() -> bool {
    true
}

fn default_workstation() -> String {
    "testworkstation".to_string()
}

fn default_toast_capacity() -> usize {
    100
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
            log_json: false,
            log_to_file: false,
            backend: BackendSettings::default(),
            workstation: default_workstation(),
            locale: Locale::default(),
            server: ServerSettings::default(),
            tanks: default_tanks(),
            toast_capacity: default_toast_capacity(),
        }
    }
}

/// Backend API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base URL for the backend HTTP API
    #[serde(default = "default_backend_url")]
    pub base_url: String,

    /// Base URL for the subscription sockets; derived from `base_url` when absent
    #[serde(default)]
    pub websocket_url: Option<String>,

    /// Client-side request timeout; none by default
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_backend_url() -> String {
    "http://localhost:8000".to_string()
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_backend_url(),
            websocket_url: None,
            request_timeout_secs: None,
        }
    }
}

/// Local console API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_server_host")]
    pub host: String,

    #[serde(default = "default_server_port")]
    pub port: u16,
}

fn default_server_host() -> String {
    "127.0.0.1".to_string()
}

fn default_server_port() -> u16 {
    8080
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            host: default_server_host(),
            port: default_server_port(),
        }
    }
}

/// A tank row of the measurements table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TankSettings {
    pub id: String,
    pub label: String,
}

fn default_tanks() -> Vec<TankSettings> {
    [
        ("C1", "Reaction tank - C1"),
        ("C2", "Filtration tank C2"),
        ("C3", "Filtration tank C3"),
        ("C4", "Filtration tank C4"),
        ("C5", "Clean water tank - C5"),
    ]
    .into_iter()
    .map(|(id, label)| TankSettings {
        id: id.to_string(),
        label: label.to_string(),
    })
    .collect()
}
