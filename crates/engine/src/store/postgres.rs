//! PostgreSQL backend over the `workforce-db` repositories.
//!
//! The single-active-entry rule is the partial unique index
//! `uq_time_entries_active_employee`; a losing concurrent insert surfaces as
//! a unique violation like any other.

use async_trait::async_trait;
use workforce_core::attendance::{NewTimeEntry, TimeEntry, UpdateTimeEntry};
use workforce_core::employee::{Employee, EmployeeAccount, EmployeeChanges, NewEmployee};
use workforce_core::session::{LoginSession, NewLoginSession};
use workforce_core::task::{NewTask, Task, TaskChanges, TaskCounts};
use workforce_core::types::{DbId, Timestamp};
use workforce_db::repositories::{EmployeeRepo, LoginSessionRepo, TaskRepo, TimeEntryRepo};
use workforce_db::DbPool;

use super::{EmployeeStore, SessionStore, StoreResult, TaskStore, TimeEntryStore};

#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

/// Convert every row, failing on the first one that does not map.
fn convert_all<R, T>(rows: Vec<R>) -> StoreResult<Vec<T>>
where
    T: TryFrom<R, Error = workforce_core::error::CoreError>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(Into::into))
        .collect()
}

#[async_trait]
impl EmployeeStore for PgStore {
    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee> {
        let row = EmployeeRepo::create(&self.pool, input).await?;
        Ok(row.into_employee()?)
    }

    async fn employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>> {
        let row = EmployeeRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(|r| r.into_employee()).transpose()?)
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<EmployeeAccount>> {
        let row = EmployeeRepo::find_by_email(&self.pool, email).await?;
        Ok(row.map(EmployeeAccount::try_from).transpose()?)
    }

    async fn active_employees(&self) -> StoreResult<Vec<Employee>> {
        let rows = EmployeeRepo::list_active(&self.pool).await?;
        let accounts: Vec<EmployeeAccount> = convert_all(rows)?;
        Ok(accounts.into_iter().map(|a| a.employee).collect())
    }

    async fn count_active_employees(&self) -> StoreResult<i64> {
        Ok(EmployeeRepo::count_active(&self.pool).await?)
    }

    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        let row = EmployeeRepo::update(&self.pool, id, changes).await?;
        Ok(row.map(|r| r.into_employee()).transpose()?)
    }
}

#[async_trait]
impl TimeEntryStore for PgStore {
    async fn insert_time_entry(&self, input: &NewTimeEntry) -> StoreResult<TimeEntry> {
        let row = TimeEntryRepo::create(&self.pool, input).await?;
        Ok(TimeEntry::try_from(row)?)
    }

    async fn time_entry_by_id(&self, id: DbId) -> StoreResult<Option<TimeEntry>> {
        let row = TimeEntryRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(TimeEntry::try_from).transpose()?)
    }

    async fn active_time_entry(&self, employee_id: DbId) -> StoreResult<Option<TimeEntry>> {
        let row = TimeEntryRepo::find_active(&self.pool, employee_id).await?;
        Ok(row.map(TimeEntry::try_from).transpose()?)
    }

    async fn time_entries(&self, employee_id: Option<DbId>) -> StoreResult<Vec<TimeEntry>> {
        convert_all(TimeEntryRepo::list(&self.pool, employee_id).await?)
    }

    async fn time_entries_clocked_in_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        employee_id: Option<DbId>,
    ) -> StoreResult<Vec<TimeEntry>> {
        let rows =
            TimeEntryRepo::list_clocked_in_between(&self.pool, start, end, employee_id).await?;
        convert_all(rows)
    }

    async fn complete_time_entry(
        &self,
        id: DbId,
        clock_out: Timestamp,
        total_hours: f64,
    ) -> StoreResult<Option<TimeEntry>> {
        let row = TimeEntryRepo::complete(&self.pool, id, clock_out, total_hours).await?;
        Ok(row.map(TimeEntry::try_from).transpose()?)
    }

    async fn update_time_entry(
        &self,
        id: DbId,
        changes: &UpdateTimeEntry,
    ) -> StoreResult<Option<TimeEntry>> {
        let row = TimeEntryRepo::update(&self.pool, id, changes).await?;
        Ok(row.map(TimeEntry::try_from).transpose()?)
    }
}

#[async_trait]
impl SessionStore for PgStore {
    async fn insert_session(&self, input: &NewLoginSession) -> StoreResult<LoginSession> {
        Ok(LoginSessionRepo::create(&self.pool, input).await?.into())
    }

    async fn end_sessions(&self, employee_id: DbId, logout_time: Timestamp) -> StoreResult<u64> {
        Ok(LoginSessionRepo::end_all_for_employee(&self.pool, employee_id, logout_time).await?)
    }

    async fn sessions(&self) -> StoreResult<Vec<LoginSession>> {
        let rows = LoginSessionRepo::list(&self.pool).await?;
        Ok(rows.into_iter().map(LoginSession::from).collect())
    }

    async fn online_employee_ids(&self) -> StoreResult<Vec<DbId>> {
        Ok(LoginSessionRepo::online_employee_ids(&self.pool).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, input: &NewTask) -> StoreResult<Task> {
        let row = TaskRepo::create(&self.pool, input).await?;
        Ok(Task::try_from(row)?)
    }

    async fn task_by_id(&self, id: DbId) -> StoreResult<Option<Task>> {
        let row = TaskRepo::find_by_id(&self.pool, id).await?;
        Ok(row.map(Task::try_from).transpose()?)
    }

    async fn tasks(&self, assigned_to: Option<DbId>) -> StoreResult<Vec<Task>> {
        convert_all(TaskRepo::list(&self.pool, assigned_to).await?)
    }

    async fn task_counts(&self, assigned_to: Option<DbId>) -> StoreResult<TaskCounts> {
        Ok(TaskRepo::counts(&self.pool, assigned_to).await?.into())
    }

    async fn update_task(&self, id: DbId, changes: &TaskChanges) -> StoreResult<Option<Task>> {
        let row = TaskRepo::update(&self.pool, id, changes).await?;
        Ok(row.map(Task::try_from).transpose()?)
    }
}
