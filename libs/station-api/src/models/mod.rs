//! API models

use serde::{Deserialize, Serialize, Serializer};

/// Scenario list response (`GET /scenarios`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListScenariosResponse {
    #[serde(default)]
    pub scenarios: Vec<ScenarioListing>,
}

/// One entry of the scenario list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioListing {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Single actuator command (`POST /task/{station}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRequest {
    pub action: String,
    pub target: String,
    #[serde(serialize_with = "serialize_task_value")]
    pub value: f64,
}

/// Whole values go on the wire as integers (`1`, not `1.0`)
fn serialize_task_value<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Empty body sent when playing a scenario
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayRequest {}

/// Identification sent once on every subscription socket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identification {
    pub cookie: String,
    pub workstation: String,
}

/// Error body returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// Best-effort human message out of a raw error body.
    ///
    /// JSON bodies with a `detail` or `message` field yield that field,
    /// anything else is returned trimmed as-is.
    pub fn message_from_body(body: &str) -> String {
        let trimmed = body.trim();
        if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(trimmed) {
            match (parsed.detail, parsed.message) {
                (Some(serde_json::Value::String(detail)), _) => return detail,
                (Some(detail), _) => return detail.to_string(),
                (None, Some(message)) => return message,
                (None, None) => {}
            }
        }
        trimmed.to_string()
    }
}
