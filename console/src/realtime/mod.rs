//! Real-time subscription channels

pub mod channel;
pub mod codec;
pub mod manager;
pub mod notifications;
pub mod state;
