//! Subscription socket loop shared by the state and notification channels

use std::future::Future;
use std::pin::Pin;

use futures::{SinkExt, StreamExt};
use station_api::models::Identification;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, error, info, warn};
use url::Url;

use crate::errors::ConsoleError;
use crate::notify::toast::{Toast, Toaster};
use crate::realtime::codec::identification_message;

/// Per-channel behaviour plugged into [`run`]
pub trait ChannelHandler: Send + Sync {
    /// Subscription path relative to the socket base URL
    fn endpoint(&self) -> &'static str;

    /// Toast shown when the socket cannot be established or breaks
    fn connection_error(&self) -> Toast;

    /// Handle one inbound text payload
    fn handle_text(&self, payload: &str);
}

/// Why a channel stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelExit {
    /// The socket could not be opened
    ConnectFailed,
    /// The socket broke after it was opened
    Errored,
    /// The server closed the socket
    Closed,
    /// The console closed the socket
    Shutdown,
}

/// Derive the socket base URL from the HTTP base URL (`http` -> `ws`, `https` -> `wss`)
pub fn websocket_base_url(backend_url: &str) -> Result<Url, ConsoleError> {
    let mut url = Url::parse(backend_url)?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        "ws" | "wss" => return Ok(with_trailing_slash(url)),
        _ => return Err(ConsoleError::ConfigError("Invalid backend URL scheme".to_string())),
    };

    url.set_scheme(scheme)
        .map_err(|_| ConsoleError::ConfigError("Failed to set scheme".to_string()))?;

    Ok(with_trailing_slash(url))
}

fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

/// Full URL of a subscription endpoint
pub fn channel_url(base: &Url, endpoint: &str) -> Result<Url, ConsoleError> {
    Ok(with_trailing_slash(base.clone()).join(endpoint)?)
}

/// Run one subscription until it fails, the server closes it, or shutdown.
///
/// Sends the identification payload once right after connecting and never
/// writes anything else. Failures surface as exactly one toast and are not
/// retried.
pub async fn run<H: ChannelHandler + ?Sized>(
    url: &Url,
    identification: &Identification,
    handler: &H,
    toaster: &dyn Toaster,
    mut shutdown_signal: Pin<Box<dyn Future<Output = ()> + Send>>,
) -> ChannelExit {
    info!("Connecting to {}", url);

    let connection = tokio::select! {
        _ = &mut shutdown_signal => {
            info!("Channel {} shut down before connecting", handler.endpoint());
            return ChannelExit::Shutdown;
        }
        result = connect_async(url.as_str()) => result,
    };

    let mut ws_stream = match connection {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", url, e);
            toaster.push(handler.connection_error());
            return ChannelExit::ConnectFailed;
        }
    };
    info!("Connected to {}", handler.endpoint());

    let hello = match identification_message(identification) {
        Ok(hello) => hello,
        Err(e) => {
            error!("Failed to encode identification: {}", e);
            let _ = ws_stream.close(None).await;
            toaster.push(handler.connection_error());
            return ChannelExit::Errored;
        }
    };

    if let Err(e) = ws_stream.send(Message::Text(hello.into())).await {
        error!("Failed to identify on {}: {}", handler.endpoint(), e);
        toaster.push(handler.connection_error());
        return ChannelExit::Errored;
    }

    loop {
        tokio::select! {
            _ = &mut shutdown_signal => {
                info!("Closing channel {}", handler.endpoint());
                let _ = ws_stream.close(None).await;
                return ChannelExit::Shutdown;
            }
            msg = ws_stream.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        debug!("Received on {}: {}", handler.endpoint(), text.as_str());
                        handler.handle_text(&text);
                    }
                    Some(Ok(Message::Binary(bytes))) => match std::str::from_utf8(&bytes) {
                        Ok(text) => handler.handle_text(text),
                        Err(_) => warn!("Discarding non-UTF-8 frame on {}", handler.endpoint()),
                    },
                    Some(Ok(Message::Close(_))) | None => {
                        warn!("Server closed channel {}", handler.endpoint());
                        return ChannelExit::Closed;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Channel {} error: {}", handler.endpoint(), e);
                        toaster.push(handler.connection_error());
                        return ChannelExit::Errored;
                    }
                }
            }
        }
    }
}
