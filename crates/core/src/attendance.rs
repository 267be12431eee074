//! Time-entry types and the rules for clocking in and out.
//!
//! Hours are wall-clock deltas. No timezone normalization or DST correction
//! is attempted; the stats day window is a fixed UTC offset.

use chrono::{Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const STATUS_ACTIVE: &str = "ACTIVE";
pub const STATUS_COMPLETED: &str = "COMPLETED";

/// Note attached to the entry created by an automatic clock-in at login.
pub const AUTO_CLOCK_IN_NOTE: &str = "Automatic clock-in on login";

const MILLIS_PER_HOUR: i64 = 3_600_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimeEntryStatus {
    Active,
    Completed,
}

impl TimeEntryStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => STATUS_ACTIVE,
            Self::Completed => STATUS_COMPLETED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_ACTIVE => Ok(Self::Active),
            STATUS_COMPLETED => Ok(Self::Completed),
            other => Err(CoreError::Validation(format!(
                "Unknown time entry status: '{other}'"
            ))),
        }
    }
}

/// A coordinate pair with an optional human-readable label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Reject non-finite or out-of-range coordinates.
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::Validation(format!(
                "latitude must be within [-90, 90], got {}",
                self.latitude
            )));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::Validation(format!(
                "longitude must be within [-180, 180], got {}",
                self.longitude
            )));
        }
        Ok(())
    }

    /// Fill in the coordinate label when no address was supplied.
    pub fn or_fallback_address(mut self) -> Self {
        if self.address.as_deref().map_or(true, str::is_empty) {
            self.address = Some(fallback_address(self.latitude, self.longitude));
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: DbId,
    pub employee_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    pub notes: Option<String>,
    /// Set only once the entry is completed.
    pub total_hours: Option<f64>,
    pub status: TimeEntryStatus,
    pub created_at: Timestamp,
}

impl TimeEntry {
    pub fn is_active(&self) -> bool {
        self.status == TimeEntryStatus::Active
    }
}

/// Store-level insert for a time entry.
#[derive(Debug, Clone)]
pub struct NewTimeEntry {
    pub employee_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub location: Location,
    pub notes: Option<String>,
    pub total_hours: Option<f64>,
    pub status: TimeEntryStatus,
    pub created_at: Timestamp,
}

/// A back-filled entry. Completed when `clock_out` is present, active otherwise.
#[derive(Debug, Clone, Deserialize)]
pub struct ManualEntry {
    pub employee_id: DbId,
    pub clock_in: Timestamp,
    pub clock_out: Option<Timestamp>,
    pub location: Location,
    pub notes: Option<String>,
}

impl ManualEntry {
    /// Validate and turn into a store insert.
    pub fn into_new_entry(self, created_at: Timestamp) -> Result<NewTimeEntry, CoreError> {
        self.location.validate()?;
        let (status, total_hours) = match self.clock_out {
            Some(clock_out) if clock_out < self.clock_in => {
                return Err(CoreError::Validation(
                    "clock_out must not be earlier than clock_in".into(),
                ));
            }
            Some(clock_out) => (
                TimeEntryStatus::Completed,
                Some(compute_total_hours(self.clock_in, clock_out)),
            ),
            None => (TimeEntryStatus::Active, None),
        };
        Ok(NewTimeEntry {
            employee_id: self.employee_id,
            clock_in: self.clock_in,
            clock_out: self.clock_out,
            location: self.location,
            notes: self.notes,
            total_hours,
            status,
            created_at,
        })
    }
}

/// Generic correction of a time entry. `None` fields are left untouched.
///
/// Applying this does not re-check the single-active-entry rule.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTimeEntry {
    pub clock_in: Option<Timestamp>,
    pub clock_out: Option<Timestamp>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub address: Option<String>,
    pub notes: Option<String>,
    pub total_hours: Option<f64>,
    pub status: Option<TimeEntryStatus>,
}

impl UpdateTimeEntry {
    pub fn apply_to(&self, entry: &mut TimeEntry) {
        if let Some(clock_in) = self.clock_in {
            entry.clock_in = clock_in;
        }
        if let Some(clock_out) = self.clock_out {
            entry.clock_out = Some(clock_out);
        }
        if let Some(latitude) = self.latitude {
            entry.latitude = latitude;
        }
        if let Some(longitude) = self.longitude {
            entry.longitude = longitude;
        }
        if let Some(address) = &self.address {
            entry.address = Some(address.clone());
        }
        if let Some(notes) = &self.notes {
            entry.notes = Some(notes.clone());
        }
        if let Some(total_hours) = self.total_hours {
            entry.total_hours = Some(total_hours);
        }
        if let Some(status) = self.status {
            entry.status = status;
        }
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// Hours between `clock_in` and `clock_out`, rounded half-up to two decimals.
///
/// A negative span (clock skew) counts as zero.
pub fn compute_total_hours(clock_in: Timestamp, clock_out: Timestamp) -> f64 {
    let millis = (clock_out - clock_in).num_milliseconds().max(0);
    let hundredths = (millis * 100 + MILLIS_PER_HOUR / 2) / MILLIS_PER_HOUR;
    hundredths as f64 / 100.0
}

/// Convert hours to integer hundredths, rounding half away from zero.
pub fn to_hundredths(hours: f64) -> i64 {
    (hours * 100.0).round() as i64
}

/// Round an hour value to two decimals.
pub fn round_hours(hours: f64) -> f64 {
    to_hundredths(hours) as f64 / 100.0
}

/// Human-readable label for a coordinate pair: `"40.0000, -74.0000"`.
pub fn fallback_address(latitude: f64, longitude: f64) -> String {
    format!("{latitude:.4}, {longitude:.4}")
}

/// The `[start, end)` window of the local day containing `now`.
pub fn day_window(now: Timestamp, offset: FixedOffset) -> (Timestamp, Timestamp) {
    let local_date = now.with_timezone(&offset).date_naive();
    let local_midnight = local_date.and_time(NaiveTime::MIN);
    // A fixed offset maps every local time to exactly one instant.
    let start = offset
        .from_local_datetime(&local_midnight)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(now);
    (start, start + Duration::hours(24))
}
