//! Clock-in / clock-out ledger.
//!
//! The one-active-entry rule is enforced by the store at insert time. Nothing
//! here reads for an active entry before inserting one.

use std::sync::Arc;

use workforce_core::attendance::{
    compute_total_hours, Location, ManualEntry, NewTimeEntry, TimeEntry, TimeEntryStatus,
    UpdateTimeEntry,
};
use workforce_core::clock::Clock;
use workforce_core::error::CoreError;
use workforce_core::types::{DbId, Timestamp};
use workforce_db::constraints::UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE;

use crate::error::{EngineError, EngineResult};
use crate::store::{StoreError, TimeEntryStore};

pub struct TimeEntryLedger {
    store: Arc<dyn TimeEntryStore>,
    clock: Arc<dyn Clock>,
}

fn already_active(err: StoreError, employee_id: DbId) -> EngineError {
    if err.is_unique_violation(UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE) {
        CoreError::AlreadyActive { employee_id }.into()
    } else {
        err.into()
    }
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound {
        entity: "TimeEntry",
        id,
    }
}

impl TimeEntryLedger {
    pub fn new(store: Arc<dyn TimeEntryStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Open a new `ACTIVE` entry at the current instant.
    ///
    /// The address is stored as given; synthesizing a fallback label is the
    /// caller's concern.
    pub async fn clock_in(
        &self,
        employee_id: DbId,
        location: Location,
        notes: Option<String>,
    ) -> EngineResult<TimeEntry> {
        location.validate()?;
        let now = self.clock.now();
        let input = NewTimeEntry {
            employee_id,
            clock_in: now,
            clock_out: None,
            location,
            notes,
            total_hours: None,
            status: TimeEntryStatus::Active,
            created_at: now,
        };
        let entry = self
            .store
            .insert_time_entry(&input)
            .await
            .map_err(|e| already_active(e, employee_id))?;

        tracing::info!(
            employee_id,
            time_entry_id = entry.id,
            clock_in = %entry.clock_in,
            "Clocked in"
        );
        Ok(entry)
    }

    /// Close the employee's active entry at the current instant.
    ///
    /// Repeating a clock-out is safe: once the entry is completed, further
    /// calls report `NoActiveEntry` and leave it untouched.
    pub async fn clock_out(&self, employee_id: DbId) -> EngineResult<TimeEntry> {
        let active = self
            .store
            .active_time_entry(employee_id)
            .await?
            .ok_or(CoreError::NoActiveEntry { employee_id })?;

        let clock_out = self.clock.now();
        let total_hours = compute_total_hours(active.clock_in, clock_out);

        // `None` means a concurrent clock-out completed it first.
        let entry = self
            .store
            .complete_time_entry(active.id, clock_out, total_hours)
            .await?
            .ok_or(CoreError::NoActiveEntry { employee_id })?;

        tracing::info!(
            employee_id,
            time_entry_id = entry.id,
            total_hours,
            "Clocked out"
        );
        Ok(entry)
    }

    /// Back-fill an entry. Completed when a clock-out is supplied; otherwise
    /// it is `ACTIVE` and subject to the same one-active rule as
    /// [`clock_in`](Self::clock_in).
    pub async fn create_manual_entry(&self, entry: ManualEntry) -> EngineResult<TimeEntry> {
        let employee_id = entry.employee_id;
        let input = entry.into_new_entry(self.clock.now())?;
        let created = self
            .store
            .insert_time_entry(&input)
            .await
            .map_err(|e| already_active(e, employee_id))?;

        tracing::info!(
            employee_id,
            time_entry_id = created.id,
            status = created.status.as_str(),
            "Manual time entry created"
        );
        Ok(created)
    }

    pub async fn get_active(&self, employee_id: DbId) -> EngineResult<Option<TimeEntry>> {
        Ok(self.store.active_time_entry(employee_id).await?)
    }

    pub async fn get(&self, id: DbId) -> EngineResult<TimeEntry> {
        self.store
            .time_entry_by_id(id)
            .await?
            .ok_or_else(|| not_found(id).into())
    }

    /// Newest clock-in first. `None` lists every employee's entries.
    pub async fn list_for(&self, employee_id: Option<DbId>) -> EngineResult<Vec<TimeEntry>> {
        let entries = self.store.time_entries(employee_id).await?;
        tracing::debug!(?employee_id, count = entries.len(), "Listed time entries");
        Ok(entries)
    }

    /// Entries whose clock-in lies in `[start, end)`.
    pub async fn list_clocked_in_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        employee_id: Option<DbId>,
    ) -> EngineResult<Vec<TimeEntry>> {
        Ok(self
            .store
            .time_entries_clocked_in_between(start, end, employee_id)
            .await?)
    }

    /// Administrative correction.
    ///
    /// No single-active check is made here. The store still refuses a change
    /// that would leave an employee with two active entries, reported as
    /// `AlreadyActive`.
    pub async fn update(&self, id: DbId, changes: UpdateTimeEntry) -> EngineResult<TimeEntry> {
        if changes.latitude.is_some() || changes.longitude.is_some() {
            Location::new(
                changes.latitude.unwrap_or_default(),
                changes.longitude.unwrap_or_default(),
            )
            .validate()?;
        }
        let current = self.get(id).await?;
        let entry = self
            .store
            .update_time_entry(id, &changes)
            .await
            .map_err(|e| already_active(e, current.employee_id))?
            .ok_or_else(|| not_found(id))?;

        tracing::info!(
            time_entry_id = id,
            employee_id = entry.employee_id,
            "Time entry updated"
        );
        Ok(entry)
    }
}
