//! Domain models

pub mod condition;
pub mod notification;
pub mod scenario;
pub mod station;
