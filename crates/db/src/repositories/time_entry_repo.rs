//! Repository for the `time_entries` table.

use sqlx::PgPool;
use workforce_core::attendance::{NewTimeEntry, UpdateTimeEntry, STATUS_ACTIVE, STATUS_COMPLETED};
use workforce_core::types::{DbId, Timestamp};

use crate::models::time_entry::TimeEntryRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, clock_in, clock_out, latitude, longitude, address, \
                       notes, total_hours, status, created_at";

/// Provides CRUD operations for time entries.
pub struct TimeEntryRepo;

impl TimeEntryRepo {
    /// Insert a new time entry, returning the created row.
    ///
    /// An `ACTIVE` insert for an employee who already has one fails with a
    /// unique violation on `uq_time_entries_active_employee`.
    pub async fn create(pool: &PgPool, input: &NewTimeEntry) -> Result<TimeEntryRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO time_entries
                (employee_id, clock_in, clock_out, latitude, longitude, address, notes,
                 total_hours, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(input.employee_id)
            .bind(input.clock_in)
            .bind(input.clock_out)
            .bind(input.location.latitude)
            .bind(input.location.longitude)
            .bind(&input.location.address)
            .bind(&input.notes)
            .bind(input.total_hours)
            .bind(input.status.as_str())
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a time entry by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TimeEntryRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM time_entries WHERE id = $1");
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the active entry for an employee, if any.
    pub async fn find_active(
        pool: &PgPool,
        employee_id: DbId,
    ) -> Result<Option<TimeEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries
             WHERE employee_id = $1 AND status = '{STATUS_ACTIVE}'
             ORDER BY clock_in DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(employee_id)
            .fetch_optional(pool)
            .await
    }

    /// List entries newest clock-in first, optionally for a single employee.
    pub async fn list(
        pool: &PgPool,
        employee_id: Option<DbId>,
    ) -> Result<Vec<TimeEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries
             WHERE ($1::BIGINT IS NULL OR employee_id = $1)
             ORDER BY clock_in DESC, id DESC"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// List entries whose clock-in falls in `[start, end)`, optionally for a
    /// single employee.
    pub async fn list_clocked_in_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
        employee_id: Option<DbId>,
    ) -> Result<Vec<TimeEntryRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM time_entries
             WHERE clock_in >= $1 AND clock_in < $2
               AND ($3::BIGINT IS NULL OR employee_id = $3)
             ORDER BY clock_in DESC, id DESC"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(start)
            .bind(end)
            .bind(employee_id)
            .fetch_all(pool)
            .await
    }

    /// Complete an entry that is still active.
    ///
    /// Returns `None` if the entry does not exist or was already completed,
    /// so a repeated clock-out never overwrites the first one.
    pub async fn complete(
        pool: &PgPool,
        id: DbId,
        clock_out: Timestamp,
        total_hours: f64,
    ) -> Result<Option<TimeEntryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET
                clock_out = $2,
                total_hours = $3,
                status = '{STATUS_COMPLETED}'
             WHERE id = $1 AND status = '{STATUS_ACTIVE}'
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(id)
            .bind(clock_out)
            .bind(total_hours)
            .fetch_optional(pool)
            .await
    }

    /// Update a time entry. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTimeEntry,
    ) -> Result<Option<TimeEntryRow>, sqlx::Error> {
        let query = format!(
            "UPDATE time_entries SET
                clock_in = COALESCE($2, clock_in),
                clock_out = COALESCE($3, clock_out),
                latitude = COALESCE($4, latitude),
                longitude = COALESCE($5, longitude),
                address = COALESCE($6, address),
                notes = COALESCE($7, notes),
                total_hours = COALESCE($8, total_hours),
                status = COALESCE($9, status)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, TimeEntryRow>(&query)
            .bind(id)
            .bind(input.clock_in)
            .bind(input.clock_out)
            .bind(input.latitude)
            .bind(input.longitude)
            .bind(&input.address)
            .bind(&input.notes)
            .bind(input.total_hours)
            .bind(input.status.map(|s| s.as_str()))
            .fetch_optional(pool)
            .await
    }
}
