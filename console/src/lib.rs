//! Station console library
//!
//! Operator console for a water-treatment station: scenario management,
//! manual actuator commands, and live station state and task notifications.

pub mod app;
pub mod cache;
pub mod errors;
pub mod filesys;
pub mod http;
pub mod logs;
pub mod models;
pub mod notify;
pub mod realtime;
pub mod server;
pub mod storage;
pub mod utils;
