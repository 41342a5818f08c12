//! User-facing message catalog

/// Console language
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    En,
    Pl,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Pl => "pl",
        }
    }

    /// Message catalog for this locale
    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Locale::En => &EN,
            Locale::Pl => &PL,
        }
    }
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "pl" | "pl-pl" => Ok(Locale::Pl),
            _ => Err(format!("Unsupported locale: {}", s)),
        }
    }
}

impl serde::Serialize for Locale {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Locale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Every string the console shows to an operator
#[derive(Debug)]
pub struct Catalog {
    pub error_header: &'static str,
    pub state_socket_error: &'static str,
    pub notification_socket_error: &'static str,

    pub task_done_header: &'static str,
    pub task_conditions_header: &'static str,
    pub task_failed_header: &'static str,
    pub connector_error_body: &'static str,

    pub list_failed_header: &'static str,
    pub fetch_failed_header: &'static str,
    pub save_failed_header: &'static str,
    pub saved_header: &'static str,
    pub delete_failed_header: &'static str,
    pub deleted_header: &'static str,
    pub scenario_label: &'static str,
    pub play_failed_header: &'static str,
    pub initial_conditions_body: &'static str,
    pub task_submit_failed_header: &'static str,

    pub open_valve: &'static str,
    pub close_valve: &'static str,
    pub pump_on: &'static str,
    pub pump_off: &'static str,
}

impl Catalog {
    /// Body of the "scenario deleted" / "scenario saved" toasts
    pub fn scenario_body(&self, name: &str) -> String {
        format!("{}: {}", self.scenario_label, name)
    }
}

static EN: Catalog = Catalog {
    error_header: "Error",
    state_socket_error: "Error connecting to state socket",
    notification_socket_error: "Error connecting to notification socket",

    task_done_header: "Task completed",
    task_conditions_header: "Task conditions were not met",
    task_failed_header: "Error while executing task",
    connector_error_body: "Server could not reach the station",

    list_failed_header: "Error while listing scenarios",
    fetch_failed_header: "Error while fetching scenario",
    save_failed_header: "Error while saving scenario",
    saved_header: "Scenario saved",
    delete_failed_header: "Error while deleting scenario",
    deleted_header: "Scenario deleted",
    scenario_label: "Scenario",
    play_failed_header: "Error while running scenario",
    initial_conditions_body: "Initial conditions of the scenario were not met",
    task_submit_failed_header: "Error while sending task",

    open_valve: "Open valve",
    close_valve: "Close valve",
    pump_on: "Turn on pump",
    pump_off: "Turn off pump",
};

// Socket errors are always shown in English.
static PL: Catalog = Catalog {
    error_header: "Error",
    state_socket_error: "Error connecting to state socket",
    notification_socket_error: "Error connecting to notification socket",

    task_done_header: "Zadanie zostało wykonane",
    task_conditions_header: "Warunki zadania nie zostały spełnione",
    task_failed_header: "Błąd podczas wykonywania zadania",
    connector_error_body: "Serwer nie mógł się połączyć ze stacją",

    list_failed_header: "Błąd podczas wykonywania listowania scenariuszy",
    fetch_failed_header: "Błąd podczas pobierania scenariusza",
    save_failed_header: "Błąd podczas zapisywania scenariusza",
    saved_header: "Zapisano scenariusz",
    delete_failed_header: "Błąd podczas usuwania scenariusza",
    deleted_header: "Usunięto scenariusz",
    scenario_label: "Scenariusz",
    play_failed_header: "Błąd podczas wykonywania scenariusza",
    initial_conditions_body: "Warunki początkowe scenariusza nie zostały spełnione",
    task_submit_failed_header: "Błąd podczas wysyłania zadania",

    open_valve: "Otwórz zawór",
    close_valve: "Zamknij zawór",
    pump_on: "Włącz pompę",
    pump_off: "Wyłącz pompę",
};
