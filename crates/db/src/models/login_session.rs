//! Login session row model.

use sqlx::FromRow;
use workforce_core::attendance::Location;
use workforce_core::session::LoginSession;
use workforce_core::types::{DbId, Timestamp};

/// A row from the `login_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct LoginSessionRow {
    pub id: DbId,
    pub employee_id: DbId,
    pub login_time: Timestamp,
    pub logout_time: Option<Timestamp>,
    pub ip_address: String,
    pub user_agent: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub is_active: bool,
}

impl From<LoginSessionRow> for LoginSession {
    fn from(row: LoginSessionRow) -> Self {
        // A location is only meaningful with both coordinates.
        let location = match (row.latitude, row.longitude) {
            (Some(latitude), Some(longitude)) => Some(Location {
                latitude,
                longitude,
                address: row.address,
            }),
            _ => None,
        };
        LoginSession {
            id: row.id,
            employee_id: row.employee_id,
            login_time: row.login_time,
            logout_time: row.logout_time,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            location,
            is_active: row.is_active,
        }
    }
}
