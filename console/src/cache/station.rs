//! Cached station view fed by the state and notification channels

use std::collections::HashMap;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::station::StationState;

/// Source of the measurements shown to the operator
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Simulation,
    Live,
}

impl Mode {
    pub fn toggled(&self) -> Mode {
        match self {
            Mode::Simulation => Mode::Live,
            Mode::Live => Mode::Simulation,
        }
    }
}

#[derive(Debug, Default)]
struct StationView {
    current_scenario: String,
    live: Option<StationState>,
    simulation: HashMap<String, f64>,
    mode: Mode,
}

/// In-memory station view
#[derive(Debug, Default)]
pub struct StationCache {
    view: RwLock<StationView>,
}

impl StationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Name of the running scenario, empty when idle
    pub fn current_scenario(&self) -> String {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        view.current_scenario.clone()
    }

    /// Replace the cached snapshot and current scenario with a new one
    pub fn apply_snapshot(&self, state: StationState) {
        let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
        if view.current_scenario != state.current_scenario {
            debug!(
                "Current scenario changed: '{}' -> '{}'",
                view.current_scenario, state.current_scenario
            );
        }
        view.current_scenario = state.current_scenario.clone();
        view.live = Some(state);
    }

    /// Mark the running scenario as finished
    pub fn end_scenario(&self) {
        let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
        view.current_scenario.clear();
    }

    /// Latest snapshot received from the station
    pub fn live_state(&self) -> Option<StationState> {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        view.live.clone()
    }

    /// Replace the simulated tank levels
    pub fn set_simulation_levels(&self, levels: HashMap<String, f64>) {
        let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
        view.simulation = levels;
    }

    pub fn mode(&self) -> Mode {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        view.mode
    }

    pub fn set_mode(&self, mode: Mode) {
        let mut view = self.view.write().unwrap_or_else(|e| e.into_inner());
        view.mode = mode;
    }

    /// Water level of a tank from the source selected by the mode
    pub fn water_level(&self, tank: &str) -> Option<f64> {
        let view = self.view.read().unwrap_or_else(|e| e.into_inner());
        match view.mode {
            Mode::Live => view.live.as_ref().and_then(|s| s.water_level(tank)),
            Mode::Simulation => view.simulation.get(tank).copied(),
        }
    }
}
