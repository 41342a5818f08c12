//! Scenario registry API client

use station_api::models::{ListScenariosResponse, PlayRequest, ScenarioListing};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::models::scenario::Scenario;

impl HttpClient {
    /// List all scenarios known to the backend
    pub async fn list_scenarios(&self, cookie: &str) -> Result<Vec<ScenarioListing>, ConsoleError> {
        let response: ListScenariosResponse = self.get(&["scenarios"], cookie).await?;
        Ok(response.scenarios)
    }

    /// Fetch a full scenario document by name
    pub async fn get_scenario(&self, name: &str, cookie: &str) -> Result<Scenario, ConsoleError> {
        let mut scenario: Scenario = self.get(&["scenario", name], cookie).await?;
        if scenario.name.is_empty() {
            scenario.name = name.to_string();
        }
        Ok(scenario)
    }

    /// Create a scenario or replace the one with the same name
    pub async fn save_scenario(&self, scenario: &Scenario, cookie: &str) -> Result<(), ConsoleError> {
        self.put(&["scenario", &scenario.name], cookie, scenario).await
    }

    /// Delete a scenario by name
    pub async fn delete_scenario(&self, name: &str, cookie: &str) -> Result<(), ConsoleError> {
        self.delete(&["scenario", name], cookie).await
    }

    /// Start a scenario on a station; a 400 means its initial conditions do not hold
    pub async fn play_scenario(&self, station: &str, name: &str, cookie: &str) -> Result<(), ConsoleError> {
        self.post(&["scenario", station, name], cookie, &PlayRequest {}).await
    }
}
