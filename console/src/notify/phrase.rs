//! Task-to-phrase rendering

use crate::errors::ConsoleError;
use crate::models::notification::TaskRef;
use crate::notify::messages::Locale;

/// Actuator class, encoded in the first character of its identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorClass {
    Valve,
    Pump,
}

impl ActuatorClass {
    pub fn from_target(target: &str) -> Result<Self, ConsoleError> {
        match target.chars().next() {
            Some('V') => Ok(ActuatorClass::Valve),
            Some('P') => Ok(ActuatorClass::Pump),
            Some(other) => Err(ConsoleError::RenderError(format!(
                "unknown actuator class '{}' in target '{}'",
                other, target
            ))),
            None => Err(ConsoleError::RenderError("empty task target".to_string())),
        }
    }
}

/// Render a task as an operator phrase, e.g. "Open valve V3".
///
/// Only 0 (off/closed) and 1 (on/open) are valid values.
pub fn render_task_phrase(task: &TaskRef, locale: Locale) -> Result<String, ConsoleError> {
    let class = ActuatorClass::from_target(&task.target)?;
    let on = if task.value == 1.0 {
        true
    } else if task.value == 0.0 {
        false
    } else {
        return Err(ConsoleError::RenderError(format!(
            "value {} for target '{}' is neither 0 nor 1",
            task.value, task.target
        )));
    };

    let catalog = locale.catalog();
    let verb = match (class, on) {
        (ActuatorClass::Valve, true) => catalog.open_valve,
        (ActuatorClass::Valve, false) => catalog.close_valve,
        (ActuatorClass::Pump, true) => catalog.pump_on,
        (ActuatorClass::Pump, false) => catalog.pump_off,
    };
    Ok(format!("{} {}", verb, task.target))
}

/// Phrase used when a task cannot be rendered
pub fn raw_task_phrase(task: &TaskRef) -> String {
    format!("{} {} = {}", task.action, task.target, task.value)
}
