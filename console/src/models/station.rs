//! Station state snapshots

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::condition::MeasurementSource;

/// Station snapshot pushed on the state channel
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StationState {
    /// Name of the running scenario, empty when idle
    #[serde(rename = "currentScenario", default)]
    pub current_scenario: String,

    #[serde(default)]
    pub tanks: HashMap<String, TankState>,

    /// Fields the console does not interpret
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Measurements of a single tank
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankState {
    #[serde(default)]
    pub water_level: Option<f64>,

    /// Other tank measurements
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl StationState {
    pub fn is_idle(&self) -> bool {
        self.current_scenario.is_empty()
    }

    /// Water level of a tank, if reported
    pub fn water_level(&self, tank: &str) -> Option<f64> {
        self.tanks.get(tank).and_then(|t| t.water_level)
    }
}

impl MeasurementSource for StationState {
    fn measurement(&self, measurement: &str, field: &str) -> Option<f64> {
        let tank = self.tanks.get(field)?;
        if measurement == "water_level" {
            return tank.water_level;
        }
        tank.extra.get(measurement).and_then(|v| v.as_f64())
    }
}
