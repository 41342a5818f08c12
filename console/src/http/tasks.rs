//! Single task submission

use station_api::models::TaskRequest;

use crate::errors::ConsoleError;
use crate::http::client::HttpClient;

impl HttpClient {
    /// Execute one actuator command on a station.
    ///
    /// Returns the HTTP status whether or not the backend accepted the task;
    /// only transport failures are errors.
    pub async fn submit_task(&self, station: &str, task: &TaskRequest, cookie: &str) -> Result<u16, ConsoleError> {
        self.post_for_status(&["task", station], cookie, task).await
    }
}
