//! Time entry row model.

use sqlx::FromRow;
use workforce_core::attendance::{TimeEntry, TimeEntryStatus};
use workforce_core::error::CoreError;
use workforce_core::types::{DbId, Timestamp};

/// A row from the `time_entries` table.
#[derive(Debug, Clone, FromRow)]
pub struct TimeEntryRow {
    pub id: DbId,
    pub employee_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub total_hours: Option<f64>,
    pub status: String,
    pub created_at: Timestamp,
}

impl TryFrom<TimeEntryRow> for TimeEntry {
    type Error = CoreError;

    fn try_from(row: TimeEntryRow) -> Result<Self, Self::Error> {
        Ok(TimeEntry {
            id: row.id,
            employee_id: row.employee_id,
            clock_in: row.clock_in,
            clock_out: row.clock_out,
            latitude: row.latitude,
            longitude: row.longitude,
            address: row.address,
            notes: row.notes,
            total_hours: row.total_hours,
            status: TimeEntryStatus::from_str(&row.status)?,
            created_at: row.created_at,
        })
    }
}
