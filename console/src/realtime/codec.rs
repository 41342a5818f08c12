//! Subscription wire format
//!
//! Inbound payloads are encoded twice: the text frame holds a JSON string
//! whose content is the JSON document itself.

use serde::{de::DeserializeOwned, Serialize};
use station_api::models::Identification;

use crate::errors::ConsoleError;

/// Decode a double-encoded inbound payload
pub fn decode_double_encoded<T: DeserializeOwned>(payload: &str) -> Result<T, ConsoleError> {
    let inner: String = serde_json::from_str(payload)?;
    Ok(serde_json::from_str(&inner)?)
}

/// Encode a value the way the backend sends it
pub fn encode_double<T: Serialize>(value: &T) -> Result<String, ConsoleError> {
    let inner = serde_json::to_string(value)?;
    Ok(serde_json::to_string(&inner)?)
}

/// The single outbound message of a subscription (plain JSON)
pub fn identification_message(identification: &Identification) -> Result<String, ConsoleError> {
    Ok(serde_json::to_string(identification)?)
}
