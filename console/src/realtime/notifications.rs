//! Task notification channel

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cache::station::StationCache;
use crate::models::notification::{NotificationEvent, NotificationStatus, TaskStatus};
use crate::notify::messages::Locale;
use crate::notify::phrase::{raw_task_phrase, render_task_phrase};
use crate::notify::toast::{Toast, Toaster};
use crate::realtime::channel::ChannelHandler;
use crate::realtime::codec::decode_double_encoded;

pub const NOTIFICATIONS_ENDPOINT: &str = "subscribe/notifications";

/// What a notification event leads to
#[derive(Debug, Clone, PartialEq)]
pub enum NotificationOutcome {
    /// The running scenario finished; no toast
    ScenarioEnded,
    /// Exactly one toast
    Toast(Toast),
    /// Status the console does not know; logged only
    Ignored(String),
}

/// Turns task events into toasts and tracks the end of scenarios
pub struct NotificationHandler {
    station: Arc<StationCache>,
    toaster: Arc<dyn Toaster>,
    locale: Locale,
}

impl NotificationHandler {
    pub fn new(station: Arc<StationCache>, toaster: Arc<dyn Toaster>, locale: Locale) -> Self {
        Self {
            station,
            toaster,
            locale,
        }
    }

    /// Decide what an event means without applying it
    pub fn outcome(&self, event: &NotificationEvent) -> NotificationOutcome {
        if event.is_end_of_scenario() {
            return NotificationOutcome::ScenarioEnded;
        }

        let catalog = self.locale.catalog();
        match event.status() {
            NotificationStatus::Known(TaskStatus::Success) => {
                NotificationOutcome::Toast(Toast::success(catalog.task_done_header, self.phrase(event)))
            }
            NotificationStatus::Known(TaskStatus::ConditionsNotMet) => {
                NotificationOutcome::Toast(Toast::warning(catalog.task_conditions_header, self.phrase(event)))
            }
            NotificationStatus::Known(TaskStatus::ConnectorError) => NotificationOutcome::Toast(Toast::error(
                catalog.task_failed_header,
                catalog.connector_error_body,
            )),
            NotificationStatus::Unknown(raw) => NotificationOutcome::Ignored(raw),
        }
    }

    /// Apply an event to the station view and the toast feed
    pub fn handle_event(&self, event: &NotificationEvent) {
        match self.outcome(event) {
            NotificationOutcome::ScenarioEnded => {
                debug!("Scenario finished");
                self.station.end_scenario();
            }
            NotificationOutcome::Toast(toast) => self.toaster.push(toast),
            NotificationOutcome::Ignored(raw) => {
                warn!(
                    "Ignoring notification with unknown status '{}' for task {} {}",
                    raw, event.task.action, event.task.target
                );
            }
        }
    }

    fn phrase(&self, event: &NotificationEvent) -> String {
        match render_task_phrase(&event.task, self.locale) {
            Ok(phrase) => phrase,
            Err(e) => {
                warn!("Cannot render task phrase: {}", e);
                raw_task_phrase(&event.task)
            }
        }
    }
}

impl ChannelHandler for NotificationHandler {
    fn endpoint(&self) -> &'static str {
        NOTIFICATIONS_ENDPOINT
    }

    fn connection_error(&self) -> Toast {
        let catalog = self.locale.catalog();
        Toast::error(catalog.error_header, catalog.notification_socket_error)
    }

    fn handle_text(&self, payload: &str) {
        match decode_double_encoded::<NotificationEvent>(payload) {
            Ok(event) => self.handle_event(&event),
            Err(e) => warn!("Discarding malformed notification: {}", e),
        }
    }
}
