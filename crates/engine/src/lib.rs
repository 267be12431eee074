//! Attendance and session lifecycle engine.
//!
//! Five components share one store:
//!
//! - [`directory::EmployeeDirectory`] owns identities and credentials.
//! - [`ledger::TimeEntryLedger`] owns clock-in/clock-out and the
//!   one-active-entry-per-employee rule.
//! - [`sessions::SessionTracker`] records login/logout events.
//! - [`tasks::TaskBoard`] owns task assignment and status.
//! - [`stats::StatsAggregator`] derives dashboard snapshots on demand.
//!
//! [`workforce::Workforce`] wires them together and adds the login and
//! logout use cases.

pub mod config;
pub mod directory;
pub mod error;
pub mod ledger;
pub mod sessions;
pub mod stats;
pub mod store;
pub mod tasks;
pub mod workforce;

pub use error::{EngineError, EngineResult};
pub use workforce::Workforce;
