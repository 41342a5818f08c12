//! Server state

use std::sync::Arc;

use crate::app::dashboard::Dashboard;
use crate::notify::toast::ToastFeed;

/// Server state shared across handlers
pub struct ServerState {
    pub dashboard: Arc<Dashboard>,
    pub toasts: Arc<ToastFeed>,
}

impl ServerState {
    pub fn new(dashboard: Arc<Dashboard>, toasts: Arc<ToastFeed>) -> Self {
        Self { dashboard, toasts }
    }
}
