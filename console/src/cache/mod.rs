//! In-memory console caches

pub mod scenarios;
pub mod station;
