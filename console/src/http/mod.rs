//! Station backend HTTP API

pub mod api;
pub mod client;
pub mod scenarios;
pub mod tasks;
