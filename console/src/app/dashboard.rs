//! Operator dashboard: every action the console offers, with its toasts

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use station_api::models::TaskRequest;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::cache::scenarios::ScenarioList;
use crate::cache::station::{Mode, StationCache};
use crate::errors::ConsoleError;
use crate::http::api::StationApi;
use crate::models::scenario::{Scenario, ScenarioSummary};
use crate::notify::messages::{Catalog, Locale};
use crate::notify::toast::{Toast, Toaster};
use crate::realtime::manager::{self, ConnectionManager};
use crate::storage::session::{Permission, SessionStore};
use crate::storage::settings::TankSettings;

/// Dashboard options
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Station identity sent with plays, tasks and subscriptions
    pub workstation: String,

    pub locale: Locale,

    /// Measurement rows, in display order
    pub tanks: Vec<TankSettings>,

    /// Subscription channels; `None` keeps the dashboard offline
    pub realtime: Option<manager::Options>,
}

impl Default for DashboardOptions {
    fn default() -> Self {
        Self {
            workstation: "testworkstation".to_string(),
            locale: Locale::default(),
            tanks: Vec::new(),
            realtime: None,
        }
    }
}

/// Which screen the operator sees
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Login,
    Main,
}

/// One row of the measurements table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasurementRow {
    pub tank: String,
    pub label: String,
    /// Water level with one decimal, absent when unknown
    pub height: Option<String>,
}

/// Everything the dashboard screen shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub view: View,
    pub mode: Mode,
    pub current_scenario: String,
    pub can_play: bool,
    pub scenarios: Vec<ScenarioSummary>,
    pub measurements: Vec<MeasurementRow>,
}

/// The operator console
pub struct Dashboard {
    api: Arc<dyn StationApi>,
    session: Arc<SessionStore>,
    station: Arc<StationCache>,
    scenarios: Arc<ScenarioList>,
    toaster: Arc<dyn Toaster>,
    options: DashboardOptions,
    channels: Mutex<Option<ConnectionManager>>,
}

impl Dashboard {
    pub fn new(
        api: Arc<dyn StationApi>,
        session: Arc<SessionStore>,
        station: Arc<StationCache>,
        scenarios: Arc<ScenarioList>,
        toaster: Arc<dyn Toaster>,
        options: DashboardOptions,
    ) -> Self {
        Self {
            api,
            session,
            station,
            scenarios,
            toaster,
            options,
            channels: Mutex::new(None),
        }
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn station(&self) -> &StationCache {
        &self.station
    }

    pub fn workstation(&self) -> &str {
        &self.options.workstation
    }

    fn catalog(&self) -> &'static Catalog {
        self.options.locale.catalog()
    }

    // ============================== SESSION ============================== //

    /// Start a session, open the channels and load the scenario list
    pub async fn login(&self, cookie: &str, permission: Permission) -> Result<(), ConsoleError> {
        self.session.login(cookie, permission).await?;
        self.mount().await?;
        // failures are already reported as toasts
        let _ = self.load_scenarios().await;
        Ok(())
    }

    /// End the session and close the channels
    pub async fn logout(&self) -> Result<(), ConsoleError> {
        self.unmount().await;
        self.session.logout().await
    }

    /// Open the subscription channels if they are configured and not running.
    ///
    /// Channels that already stopped (failed or closed by the server) are
    /// replaced by fresh ones.
    pub async fn mount(&self) -> Result<(), ConsoleError> {
        let Some(options) = &self.options.realtime else {
            return Ok(());
        };

        let mut channels = self.channels.lock().await;
        if channels.as_ref().is_some_and(|connection| connection.is_active()) {
            return Ok(());
        }
        if let Some(stale) = channels.take() {
            info!("Reopening stopped channels");
            if let Err(e) = stale.close().await {
                error!("Failed to close stopped channels: {}", e);
            }
        }

        let connection = ConnectionManager::open(
            options,
            &self.session,
            &self.options.workstation,
            self.station.clone(),
            self.toaster.clone(),
            self.options.locale,
        )
        .await?;
        *channels = Some(connection);
        Ok(())
    }

    /// Close the subscription channels, if open
    pub async fn unmount(&self) {
        let connection = self.channels.lock().await.take();
        if let Some(connection) = connection {
            if let Err(e) = connection.close().await {
                error!("Failed to close channels: {}", e);
            }
        }
    }

    pub async fn is_mounted(&self) -> bool {
        self.channels.lock().await.is_some()
    }

    // ============================= SCENARIOS ============================= //

    /// Reload the scenario list.
    ///
    /// A rejected session (401..=499) also logs the operator out.
    pub async fn load_scenarios(&self) -> Result<Vec<ScenarioSummary>, ConsoleError> {
        let cookie = self.session.cookie().await;
        match self.api.list_scenarios(&cookie).await {
            Ok(listings) => {
                self.scenarios.replace(listings);
                Ok(self.scenarios.rows())
            }
            Err(e) => {
                error!("Failed to list scenarios: {}", e);
                self.toaster
                    .push(Toast::error(self.catalog().list_failed_header, e.user_message()));

                if e.is_auth_rejection() {
                    warn!("Session rejected by the backend, logging out");
                    if let Err(logout_err) = self.logout().await {
                        error!("Failed to clear session: {}", logout_err);
                    }
                }
                Err(e)
            }
        }
    }

    pub async fn fetch_scenario(&self, name: &str) -> Result<Scenario, ConsoleError> {
        let cookie = self.session.cookie().await;
        self.api.get_scenario(name, &cookie).await.inspect_err(|e| {
            error!("Failed to fetch scenario '{}': {}", name, e);
            self.toaster
                .push(Toast::error(self.catalog().fetch_failed_header, e.user_message()));
        })
    }

    /// Create or replace a scenario, then reload the list
    pub async fn save_scenario(&self, scenario: &Scenario) -> Result<(), ConsoleError> {
        let catalog = self.catalog();

        if let Err(e) = scenario.validate() {
            warn!("Refusing to save invalid scenario '{}': {}", scenario.name, e);
            self.toaster.push(Toast::error(catalog.save_failed_header, e.user_message()));
            return Err(e);
        }

        let cookie = self.session.cookie().await;
        if let Err(e) = self.api.save_scenario(scenario, &cookie).await {
            error!("Failed to save scenario '{}': {}", scenario.name, e);
            self.toaster.push(Toast::error(catalog.save_failed_header, e.user_message()));
            return Err(e);
        }

        info!("Saved scenario '{}'", scenario.name);
        self.toaster
            .push(Toast::success(catalog.saved_header, catalog.scenario_body(&scenario.name)));
        let _ = self.load_scenarios().await;
        Ok(())
    }

    /// Delete a scenario; returns how many local rows were dropped
    pub async fn delete_scenario(&self, name: &str) -> Result<usize, ConsoleError> {
        let catalog = self.catalog();
        let cookie = self.session.cookie().await;

        match self.api.delete_scenario(name, &cookie).await {
            Ok(()) => {
                let removed = self.scenarios.remove(name);
                info!("Deleted scenario '{}' ({} local rows)", name, removed);
                self.toaster
                    .push(Toast::success(catalog.deleted_header, catalog.scenario_body(name)));
                Ok(removed)
            }
            Err(e) => {
                error!("Failed to delete scenario '{}': {}", name, e);
                self.toaster.push(Toast::error(catalog.delete_failed_header, e.user_message()));
                Err(e)
            }
        }
    }

    /// Why play is currently disabled, if it is
    pub async fn play_blocker(&self) -> Option<&'static str> {
        if self.session.permission().await == Permission::Read {
            Some("read-only session")
        } else if !self.station.current_scenario().is_empty() {
            Some("a scenario is already running")
        } else if self.station.mode() == Mode::Simulation {
            Some("console is in simulation mode")
        } else {
            None
        }
    }

    /// Ask the station to run a scenario. Success produces no toast.
    pub async fn play_scenario(&self, name: &str) -> Result<(), ConsoleError> {
        if let Some(reason) = self.play_blocker().await {
            return Err(ConsoleError::ActionDisabled(reason.to_string()));
        }

        let catalog = self.catalog();
        let cookie = self.session.cookie().await;
        match self
            .api
            .play_scenario(&self.options.workstation, name, &cookie)
            .await
        {
            Ok(()) => {
                info!("Scenario '{}' started on {}", name, self.options.workstation);
                Ok(())
            }
            Err(e) => {
                error!("Failed to play scenario '{}': {}", name, e);
                let body = if e.status() == Some(400) {
                    catalog.initial_conditions_body.to_string()
                } else {
                    e.user_message()
                };
                self.toaster.push(Toast::error(catalog.play_failed_header, body));
                Err(e)
            }
        }
    }

    // =============================== TASKS =============================== //

    /// Send one actuator command; returns the backend status code
    pub async fn submit_task(&self, task: &TaskRequest) -> Result<u16, ConsoleError> {
        let cookie = self.session.cookie().await;
        match self
            .api
            .submit_task(&self.options.workstation, task, &cookie)
            .await
        {
            Ok(status) => {
                if !(200..300).contains(&status) {
                    warn!("Task {} {} rejected with status {}", task.action, task.target, status);
                }
                Ok(status)
            }
            Err(e) => {
                error!("Failed to submit task {} {}: {}", task.action, task.target, e);
                self.toaster
                    .push(Toast::error(self.catalog().task_submit_failed_header, e.user_message()));
                Err(e)
            }
        }
    }

    // =============================== VIEW ================================ //

    pub fn set_mode(&self, mode: Mode) {
        info!("Switching to {:?} mode", mode);
        self.station.set_mode(mode);
    }

    pub fn set_simulation_levels(&self, levels: HashMap<String, f64>) {
        self.station.set_simulation_levels(levels);
    }

    pub async fn snapshot(&self) -> DashboardSnapshot {
        let view = if self.session.is_logged_in().await {
            View::Main
        } else {
            View::Login
        };

        let measurements = self
            .options
            .tanks
            .iter()
            .map(|tank| MeasurementRow {
                tank: tank.id.clone(),
                label: tank.label.clone(),
                height: self.station.water_level(&tank.id).map(|h| format!("{:.1}", h)),
            })
            .collect();

        DashboardSnapshot {
            view,
            mode: self.station.mode(),
            current_scenario: self.station.current_scenario(),
            can_play: self.play_blocker().await.is_none(),
            scenarios: self.scenarios.rows(),
            measurements,
        }
    }
}
