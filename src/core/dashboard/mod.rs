//! Session-scoped command dispatch

pub mod command;
pub mod dispatcher;

pub use command::{Command, CommandOutput};
pub use dispatcher::{Dashboard, DashboardSettings};
