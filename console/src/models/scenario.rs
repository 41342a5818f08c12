//! Scenario models

use serde::{Deserialize, Serialize};

use crate::errors::ConsoleError;
use crate::models::condition::ScenarioCondition;

/// A named scenario: initial conditions plus an ordered task list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Unique scenario name; the backend carries it in the URL, not the body
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Conditions the station must satisfy before the scenario may start
    pub initial_conditions: ScenarioCondition,

    /// Tasks in execution order
    #[serde(default)]
    pub tasks: Vec<Task>,
}

/// One actuator command of a scenario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub action: String,

    /// Actuator identifier, e.g. `V3` or `P1`
    pub target: String,

    pub value: f64,

    /// Hold the value for this many seconds, then revert
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u64>,

    /// Only apply when these conditions hold at execution time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditions: Option<ScenarioCondition>,
}

/// Display row of the scenario list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    /// Position in the list as returned by the backend
    pub id: usize,
    pub name: String,
    pub description: String,
}

impl Scenario {
    /// Check the document before it is submitted.
    ///
    /// Collects every problem rather than stopping at the first one.
    pub fn validate(&self) -> Result<(), ConsoleError> {
        let mut problems = Vec::new();

        if self.name.trim().is_empty() {
            problems.push("scenario name is empty".to_string());
        }

        for path in self.initial_conditions.empty_groups() {
            problems.push(format!("initial_conditions{} has no conditions", &path[1..]));
        }

        for (idx, task) in self.tasks.iter().enumerate() {
            if task.action.trim().is_empty() {
                problems.push(format!("tasks[{}] has no action", idx));
            }
            if task.target.trim().is_empty() {
                problems.push(format!("tasks[{}] has no target", idx));
            }
            if let Some(conditions) = &task.conditions {
                for path in conditions.empty_groups() {
                    problems.push(format!("tasks[{}].conditions{} has no conditions", idx, &path[1..]));
                }
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(ConsoleError::ValidationError(problems.join("; ")))
        }
    }
}
