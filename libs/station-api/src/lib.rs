//! Wire models shared with the station control backend.

pub mod models;
