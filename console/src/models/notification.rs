//! Notification events pushed on the notification channel

use serde::{Deserialize, Serialize};

/// Action name marking the end of a scenario run
pub const END_SCENARIO_ACTION: &str = "end_scenario";

/// Task outcome event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationEvent {
    pub task: TaskRef,

    /// Raw status string; see [`NotificationEvent::status`]
    #[serde(default)]
    pub status: String,
}

/// The task part of a notification
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskRef {
    #[serde(default)]
    pub action: String,
    #[serde(default)]
    pub target: String,
    #[serde(default)]
    pub value: f64,
}

/// Known task outcomes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Success,
    ConditionsNotMet,
    ConnectorError,
}

/// Parsed notification status
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    Known(TaskStatus),
    Unknown(String),
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Success => "success",
            TaskStatus::ConditionsNotMet => "conditions_not_met",
            TaskStatus::ConnectorError => "connector_error",
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(TaskStatus::Success),
            "conditions_not_met" => Ok(TaskStatus::ConditionsNotMet),
            "connector_error" => Ok(TaskStatus::ConnectorError),
            _ => Err(format!("Unknown task status: {}", s)),
        }
    }
}

impl NotificationEvent {
    /// Whether this event marks the end of the running scenario
    pub fn is_end_of_scenario(&self) -> bool {
        self.task.action == END_SCENARIO_ACTION
    }

    pub fn status(&self) -> NotificationStatus {
        match self.status.parse::<TaskStatus>() {
            Ok(status) => NotificationStatus::Known(status),
            Err(_) => NotificationStatus::Unknown(self.status.clone()),
        }
    }
}
