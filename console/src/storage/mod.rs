//! Persistent console storage

pub mod layout;
pub mod session;
pub mod settings;
