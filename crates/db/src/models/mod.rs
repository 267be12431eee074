//! Row models.
//!
//! Each row struct mirrors its table one-to-one and converts into the
//! corresponding `workforce_core` entity. Enumerated columns are stored as
//! `TEXT` and parsed during conversion.

pub mod employee;
pub mod login_session;
pub mod task;
pub mod time_entry;
