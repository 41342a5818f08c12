//! Error types for the station console

use thiserror::Error;

/// Main error type for the station console
#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL error: {0}")]
    UrlError(#[from] url::ParseError),

    /// The backend answered with a non-success status
    #[error("Request rejected ({status}): {message}")]
    RequestError { status: u16, message: String },

    /// A subscription socket could not be established or broke
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Task data that cannot be turned into a phrase
    #[error("Render error: {0}")]
    RenderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// The requested action is disabled in the current console state
    #[error("Action disabled: {0}")]
    ActionDisabled(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Shutdown error: {0}")]
    ShutdownError(String),
}

impl ConsoleError {
    /// HTTP status of a rejected request, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ConsoleError::RequestError { status, .. } => Some(*status),
            ConsoleError::HttpError(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the backend rejected the session (401..=499)
    pub fn is_auth_rejection(&self) -> bool {
        matches!(self.status(), Some(401..=499))
    }

    /// Message suitable for a toast body
    pub fn user_message(&self) -> String {
        match self {
            ConsoleError::RequestError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}
