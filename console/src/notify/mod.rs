//! Operator notifications

pub mod messages;
pub mod phrase;
pub mod toast;
