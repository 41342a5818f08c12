//! Owns the two subscription channels for the lifetime of a session

use std::sync::Arc;
use std::time::Duration;

use station_api::models::Identification;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use url::Url;

use crate::cache::station::StationCache;
use crate::errors::ConsoleError;
use crate::notify::messages::Locale;
use crate::notify::toast::Toaster;
use crate::realtime::channel::{self, channel_url, ChannelExit, ChannelHandler};
use crate::realtime::notifications::NotificationHandler;
use crate::realtime::state::StateHandler;
use crate::storage::session::SessionStore;

/// Connection manager options
#[derive(Debug, Clone)]
pub struct Options {
    /// Base URL the subscription endpoints are resolved against
    pub websocket_base_url: Url,

    /// How long to wait for the channels to close
    pub close_timeout: Duration,
}

impl Options {
    pub fn new(websocket_base_url: Url) -> Self {
        Self {
            websocket_base_url,
            close_timeout: Duration::from_secs(5),
        }
    }
}

/// Handles of the running state and notification channels
pub struct ConnectionManager {
    shutdown_tx: broadcast::Sender<()>,
    handles: Vec<(&'static str, JoinHandle<ChannelExit>)>,
    close_timeout: Duration,
}

impl ConnectionManager {
    /// Open the state and notification channels.
    ///
    /// Both identify themselves with the session cookie and `workstation`.
    pub async fn open(
        options: &Options,
        session: &SessionStore,
        workstation: &str,
        station: Arc<StationCache>,
        toaster: Arc<dyn Toaster>,
        locale: Locale,
    ) -> Result<Self, ConsoleError> {
        let identification = Identification {
            cookie: session.cookie().await,
            workstation: workstation.to_string(),
        };

        let (shutdown_tx, _) = broadcast::channel(1);
        let mut manager = Self {
            shutdown_tx,
            handles: Vec::with_capacity(2),
            close_timeout: options.close_timeout,
        };

        let state = Arc::new(StateHandler::new(station.clone(), locale));
        manager.spawn_channel(&options.websocket_base_url, &identification, state, toaster.clone())?;

        let notifications = Arc::new(NotificationHandler::new(station, toaster.clone(), locale));
        manager.spawn_channel(&options.websocket_base_url, &identification, notifications, toaster)?;

        Ok(manager)
    }

    fn spawn_channel<H: ChannelHandler + 'static>(
        &mut self,
        base_url: &Url,
        identification: &Identification,
        handler: Arc<H>,
        toaster: Arc<dyn Toaster>,
    ) -> Result<(), ConsoleError> {
        let endpoint = handler.endpoint();
        let url = channel_url(base_url, endpoint)?;
        let identification = identification.clone();
        let mut shutdown_rx = self.shutdown_tx.subscribe();

        info!("Opening channel {}", endpoint);
        let handle = tokio::spawn(async move {
            channel::run(
                &url,
                &identification,
                handler.as_ref(),
                toaster.as_ref(),
                Box::pin(async move {
                    let _ = shutdown_rx.recv().await;
                }),
            )
            .await
        });

        self.handles.push((endpoint, handle));
        Ok(())
    }

    /// Whether any channel is still running
    pub fn is_active(&self) -> bool {
        self.handles.iter().any(|(_, handle)| !handle.is_finished())
    }

    /// Close both channels and wait for them to stop.
    ///
    /// Channels still running after `close_timeout` are aborted.
    pub async fn close(mut self) -> Result<(), ConsoleError> {
        let _ = self.shutdown_tx.send(());
        let close_timeout = self.close_timeout;

        let handles = &mut self.handles;
        let join_all = async {
            for (endpoint, handle) in handles.iter_mut() {
                match handle.await {
                    Ok(exit) => info!("Channel {} stopped: {:?}", endpoint, exit),
                    Err(e) => error!("Channel {} task failed: {}", endpoint, e),
                }
            }
        };

        if tokio::time::timeout(close_timeout, join_all).await.is_ok() {
            self.handles.clear();
            return Ok(());
        }

        for (endpoint, handle) in &self.handles {
            if !handle.is_finished() {
                warn!("Aborting channel {}", endpoint);
                handle.abort();
            }
        }
        Err(ConsoleError::ShutdownError(format!(
            "channels did not close within {:?}",
            close_timeout
        )))
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        for (_, handle) in &self.handles {
            handle.abort();
        }
    }
}
