//! Console application wiring

pub mod dashboard;
pub mod options;
pub mod run;
pub mod state;
