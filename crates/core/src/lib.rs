//! Domain rules for attendance, login sessions, and task tracking.
//!
//! This crate has no database dependencies. Persistence and orchestration
//! live in `workforce-db` and `workforce-engine`; everything here is plain
//! data plus the pure rules that operate on it.

pub mod attendance;
pub mod clock;
pub mod employee;
pub mod error;
pub mod location;
pub mod password;
pub mod roles;
pub mod session;
pub mod stats;
pub mod task;
pub mod types;
