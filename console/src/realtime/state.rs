//! Station state channel

use std::sync::Arc;

use tracing::warn;

use crate::cache::station::StationCache;
use crate::models::station::StationState;
use crate::notify::messages::Locale;
use crate::notify::toast::Toast;
use crate::realtime::channel::ChannelHandler;
use crate::realtime::codec::decode_double_encoded;

pub const STATE_ENDPOINT: &str = "subscribe/state";

/// Replaces the cached station view with every snapshot received
pub struct StateHandler {
    station: Arc<StationCache>,
    locale: Locale,
}

impl StateHandler {
    pub fn new(station: Arc<StationCache>, locale: Locale) -> Self {
        Self { station, locale }
    }
}

impl ChannelHandler for StateHandler {
    fn endpoint(&self) -> &'static str {
        STATE_ENDPOINT
    }

    fn connection_error(&self) -> Toast {
        let catalog = self.locale.catalog();
        Toast::error(catalog.error_header, catalog.state_socket_error)
    }

    fn handle_text(&self, payload: &str) {
        match decode_double_encoded::<StationState>(payload) {
            Ok(state) => self.station.apply_snapshot(state),
            Err(e) => warn!("Discarding malformed state message: {}", e),
        }
    }
}
