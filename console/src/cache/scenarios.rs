//! Local copy of the scenario list

use std::sync::RwLock;

use station_api::models::ScenarioListing;

use crate::models::scenario::ScenarioSummary;

#[derive(Debug, Default)]
struct ListState {
    rows: Vec<ScenarioSummary>,
    loaded: bool,
}

/// Scenario rows shown on the dashboard
#[derive(Debug, Default)]
pub struct ScenarioList {
    state: RwLock<ListState>,
}

impl ScenarioList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the list with a fresh backend listing
    pub fn replace(&self, listings: Vec<ScenarioListing>) {
        let rows = listings
            .into_iter()
            .enumerate()
            .map(|(id, listing)| ScenarioSummary {
                id,
                name: listing.name,
                description: listing.description,
            })
            .collect();

        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.rows = rows;
        state.loaded = true;
    }

    /// Remove every row with this name; returns how many were removed
    pub fn remove(&self, name: &str) -> usize {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        let before = state.rows.len();
        state.rows.retain(|row| row.name != name);
        before - state.rows.len()
    }

    pub fn rows(&self) -> Vec<ScenarioSummary> {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.rows.clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.rows.iter().any(|row| row.name == name)
    }

    /// Whether a listing has been received at least once
    pub fn is_loaded(&self) -> bool {
        let state = self.state.read().unwrap_or_else(|e| e.into_inner());
        state.loaded
    }
}
