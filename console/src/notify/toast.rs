//! Toast notifications shown to the operator

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// Toast category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToastKind {
    Info,
    Success,
    Warning,
    Error,
}

/// A transient operator notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Toast {
    pub id: String,
    pub kind: ToastKind,
    pub header: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Toast {
    pub fn new(kind: ToastKind, header: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            kind,
            header: header.into(),
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Success, header, message)
    }

    pub fn warning(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Warning, header, message)
    }

    pub fn error(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToastKind::Error, header, message)
    }

    /// Single-line terminal rendering
    pub fn to_terminal_line(&self) -> String {
        let tag = match self.kind {
            ToastKind::Info => "INFO".blue(),
            ToastKind::Success => "OK".green(),
            ToastKind::Warning => "WARN".yellow(),
            ToastKind::Error => "ERROR".red(),
        };
        format!("[{}] {}: {}", tag, self.header.bold(), self.message)
    }
}

/// Sink for operator notifications
pub trait Toaster: Send + Sync {
    fn push(&self, toast: Toast);
}

/// Bounded in-memory toast feed with live subscribers
pub struct ToastFeed {
    recent: Mutex<VecDeque<Toast>>,
    capacity: usize,
    sender: broadcast::Sender<Toast>,
}

impl ToastFeed {
    /// Create a feed keeping the last `capacity` toasts; a capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (sender, _) = broadcast::channel(capacity);
        Self {
            recent: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
            sender,
        }
    }

    /// Most recent toasts, oldest first
    pub fn recent(&self) -> Vec<Toast> {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.iter().cloned().collect()
    }

    /// Receive toasts pushed from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Toast> {
        self.sender.subscribe()
    }

    pub fn len(&self) -> usize {
        let recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
        recent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ToastFeed {
    fn default() -> Self {
        Self::new(100)
    }
}

impl Toaster for ToastFeed {
    fn push(&self, toast: Toast) {
        match toast.kind {
            ToastKind::Info | ToastKind::Success => info!("[toast] {}: {}", toast.header, toast.message),
            ToastKind::Warning => warn!("[toast] {}: {}", toast.header, toast.message),
            ToastKind::Error => error!("[toast] {}: {}", toast.header, toast.message),
        }

        {
            let mut recent = self.recent.lock().unwrap_or_else(|e| e.into_inner());
            if recent.len() >= self.capacity {
                recent.pop_front();
            }
            recent.push_back(toast.clone());
        }

        // No subscribers is fine
        let _ = self.sender.send(toast);
    }
}
