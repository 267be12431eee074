//! Dashboard statistics.
//!
//! Snapshots are derived on every request and never stored. The functions
//! here do the arithmetic; gathering the inputs is the caller's job.

use serde::Serialize;

use crate::attendance::{to_hundredths, TimeEntry, TimeEntryStatus};
use crate::types::Timestamp;

/// Per-employee view used by the personal dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmployeeSnapshot {
    pub today_hours: f64,
    pub active_task_count: i64,
    pub completed_task_count: i64,
    pub total_task_count: i64,
    pub is_currently_clocked: bool,
}

/// Company-wide view used by the manager dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_employees: i64,
    pub active_employees: i64,
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub total_hours_today: f64,
    pub average_hours_per_employee: f64,
}

/// Sum `total_hours` of completed entries whose clock-in falls in
/// `[start, end)`, rounded to two decimals.
///
/// Summation happens in integer hundredths to avoid float drift.
pub fn completed_hours_in_window<'a>(
    entries: impl IntoIterator<Item = &'a TimeEntry>,
    start: Timestamp,
    end: Timestamp,
) -> f64 {
    let hundredths: i64 = entries
        .into_iter()
        .filter(|e| e.status == TimeEntryStatus::Completed)
        .filter(|e| e.clock_in >= start && e.clock_in < end)
        .filter_map(|e| e.total_hours)
        .map(to_hundredths)
        .sum();
    hundredths as f64 / 100.0
}

/// Average hours per active employee; zero when nobody is active.
pub fn average_hours(total_hours: f64, active_employees: i64) -> f64 {
    if active_employees <= 0 {
        return 0.0;
    }
    crate::attendance::round_hours(total_hours / active_employees as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn entry(clock_in: Timestamp, hours: Option<f64>, status: TimeEntryStatus) -> TimeEntry {
        TimeEntry {
            id: 1,
            employee_id: 1,
            clock_in,
            clock_out: hours.map(|_| clock_in + Duration::hours(1)),
            latitude: 40.0,
            longitude: -74.0,
            address: None,
            notes: None,
            total_hours: hours,
            status,
            created_at: clock_in,
        }
    }

    #[test]
    fn sums_only_completed_entries_inside_window() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let end = start + Duration::hours(24);
        let entries = vec![
            entry(start + Duration::hours(9), Some(2.25), TimeEntryStatus::Completed),
            entry(start + Duration::hours(13), Some(3.1), TimeEntryStatus::Completed),
            entry(start + Duration::hours(18), None, TimeEntryStatus::Active),
            // Yesterday.
            entry(start - Duration::hours(2), Some(5.0), TimeEntryStatus::Completed),
            // Exactly at the window end belongs to tomorrow.
            entry(end, Some(1.0), TimeEntryStatus::Completed),
        ];
        assert_eq!(completed_hours_in_window(&entries, start, end), 5.35);
    }

    #[test]
    fn window_start_is_inclusive() {
        let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        let entries = vec![entry(start, Some(1.5), TimeEntryStatus::Completed)];
        assert_eq!(
            completed_hours_in_window(&entries, start, start + Duration::hours(24)),
            1.5
        );
    }

    #[test]
    fn average_with_no_active_employees_is_zero() {
        assert_eq!(average_hours(12.0, 0), 0.0);
        assert_eq!(average_hours(0.0, 0), 0.0);
    }

    #[test]
    fn average_rounds_to_two_decimals() {
        assert_eq!(average_hours(10.0, 3), 3.33);
        assert_eq!(average_hours(8.0, 2), 4.0);
    }
}
