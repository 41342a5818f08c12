//! Backend operations used by the dashboard

use async_trait::async_trait;
use station_api::models::{ScenarioListing, TaskRequest};

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;
use crate::models::scenario::Scenario;

/// Station backend trait for testability
#[async_trait]
pub trait StationApi: Send + Sync {
    async fn list_scenarios(&self, cookie: &str) -> Result<Vec<ScenarioListing>, ConsoleError>;

    async fn get_scenario(&self, name: &str, cookie: &str) -> Result<Scenario, ConsoleError>;

    async fn save_scenario(&self, scenario: &Scenario, cookie: &str) -> Result<(), ConsoleError>;

    async fn delete_scenario(&self, name: &str, cookie: &str) -> Result<(), ConsoleError>;

    async fn play_scenario(&self, station: &str, name: &str, cookie: &str) -> Result<(), ConsoleError>;

    async fn submit_task(&self, station: &str, task: &TaskRequest, cookie: &str) -> Result<u16, ConsoleError>;
}

#[async_trait]
impl StationApi for HttpClient {
    async fn list_scenarios(&self, cookie: &str) -> Result<Vec<ScenarioListing>, ConsoleError> {
        HttpClient::list_scenarios(self, cookie).await
    }

    async fn get_scenario(&self, name: &str, cookie: &str) -> Result<Scenario, ConsoleError> {
        HttpClient::get_scenario(self, name, cookie).await
    }

    async fn save_scenario(&self, scenario: &Scenario, cookie: &str) -> Result<(), ConsoleError> {
        HttpClient::save_scenario(self, scenario, cookie).await
    }

    async fn delete_scenario(&self, name: &str, cookie: &str) -> Result<(), ConsoleError> {
        HttpClient::delete_scenario(self, name, cookie).await
    }

    async fn play_scenario(&self, station: &str, name: &str, cookie: &str) -> Result<(), ConsoleError> {
        HttpClient::play_scenario(self, station, name, cookie).await
    }

    async fn submit_task(&self, station: &str, task: &TaskRequest, cookie: &str) -> Result<u16, ConsoleError> {
        HttpClient::submit_task(self, station, task, cookie).await
    }
}
