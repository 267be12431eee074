//! Login-session types.
//!
//! A session marks a login event and, once closed, its logout. Sessions are
//! not per-device: ending sessions for an employee closes all of them.

use serde::{Deserialize, Serialize};

use crate::attendance::Location;
use crate::types::{DbId, Timestamp};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginSession {
    pub id: DbId,
    pub employee_id: DbId,
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
    /// Network origin of the login request.
    pub ip_address: String,
    /// Client identifier string (user agent).
    pub user_agent: String,
    pub location: Option<Location>,
    pub is_active: bool,
}

/// Store-level insert for a login session.
#[derive(Debug, Clone)]
pub struct NewLoginSession {
    pub employee_id: DbId,
    pub login_time: Timestamp,
    pub ip_address: String,
    pub user_agent: String,
    pub location: Option<Location>,
}

/// Fallback client identifier when the caller supplies none.
pub const UNKNOWN_CLIENT: &str = "Unknown";

/// Distinct employee ids with at least one active session, ordered by their
/// most recent login (newest first). `sessions` must already be newest-first.
pub fn online_employee_ids(sessions: &[LoginSession]) -> Vec<DbId> {
    let mut ids = Vec::new();
    for session in sessions.iter().filter(|s| s.is_active) {
        if !ids.contains(&session.employee_id) {
            ids.push(session.employee_id);
        }
    }
    ids
}
