//! Repository-style persistence seams.
//!
//! Components talk to storage only through these traits. Two backends ship:
//! [`memory::MemoryStore`] for tests and embedding, and
//! [`postgres::PgStore`] over the `workforce-db` repositories.
//!
//! Both backends enforce the same two unique constraints and report them by
//! the names in [`workforce_db::constraints`]:
//! one email per employee, and one `ACTIVE` time entry per employee.

use async_trait::async_trait;
use workforce_core::attendance::{NewTimeEntry, TimeEntry, UpdateTimeEntry};
use workforce_core::employee::{Employee, EmployeeAccount, EmployeeChanges, NewEmployee};
use workforce_core::error::CoreError;
use workforce_core::session::{LoginSession, NewLoginSession};
use workforce_core::task::{NewTask, Task, TaskChanges, TaskCounts};
use workforce_core::types::{DbId, Timestamp};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// PostgreSQL SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint or unique index rejected the write.
    #[error("Duplicate value violates unique constraint: {constraint}")]
    UniqueViolation { constraint: String },

    /// A stored row could not be mapped back to a domain value.
    #[error("Corrupt record: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    pub fn is_unique_violation(&self, name: &str) -> bool {
        matches!(self, Self::UniqueViolation { constraint } if constraint == name)
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().as_deref() == Some(PG_UNIQUE_VIOLATION) {
                let constraint = db_err.constraint().unwrap_or("unknown").to_string();
                return Self::UniqueViolation { constraint };
            }
        }
        Self::Database(err)
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        Self::Corrupt(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fails with a unique violation when the email is taken.
    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee>;

    async fn employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>>;

    /// Exact, case-sensitive match. Includes the credential hash.
    async fn account_by_email(&self, email: &str) -> StoreResult<Option<EmployeeAccount>>;

    /// Active employees, newest first.
    async fn active_employees(&self) -> StoreResult<Vec<Employee>>;

    async fn count_active_employees(&self) -> StoreResult<i64>;

    /// `None` when no such employee exists.
    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>>;
}

#[async_trait]
pub trait TimeEntryStore: Send + Sync {
    /// Check-and-insert as one atomic step: an `ACTIVE` insert for an employee
    /// who already has one fails with a unique violation.
    async fn insert_time_entry(&self, input: &NewTimeEntry) -> StoreResult<TimeEntry>;

    async fn time_entry_by_id(&self, id: DbId) -> StoreResult<Option<TimeEntry>>;

    async fn active_time_entry(&self, employee_id: DbId) -> StoreResult<Option<TimeEntry>>;

    /// Newest clock-in first; all employees when `employee_id` is `None`.
    async fn time_entries(&self, employee_id: Option<DbId>) -> StoreResult<Vec<TimeEntry>>;

    /// Entries whose clock-in lies in `[start, end)`.
    async fn time_entries_clocked_in_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        employee_id: Option<DbId>,
    ) -> StoreResult<Vec<TimeEntry>>;

    /// Complete an entry only if it is still `ACTIVE`; `None` otherwise.
    async fn complete_time_entry(
        &self,
        id: DbId,
        clock_out: Timestamp,
        total_hours: f64,
    ) -> StoreResult<Option<TimeEntry>>;

    async fn update_time_entry(
        &self,
        id: DbId,
        changes: &UpdateTimeEntry,
    ) -> StoreResult<Option<TimeEntry>>;
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn insert_session(&self, input: &NewLoginSession) -> StoreResult<LoginSession>;

    /// Close every active session of the employee; returns how many closed.
    async fn end_sessions(&self, employee_id: DbId, logout_time: Timestamp) -> StoreResult<u64>;

    /// Newest login first.
    async fn sessions(&self) -> StoreResult<Vec<LoginSession>>;

    /// Distinct employees with at least one active session.
    async fn online_employee_ids(&self) -> StoreResult<Vec<DbId>>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, input: &NewTask) -> StoreResult<Task>;

    async fn task_by_id(&self, id: DbId) -> StoreResult<Option<Task>>;

    /// Newest created first; all tasks when `assigned_to` is `None`.
    async fn tasks(&self, assigned_to: Option<DbId>) -> StoreResult<Vec<Task>>;

    async fn task_counts(&self, assigned_to: Option<DbId>) -> StoreResult<TaskCounts>;

    async fn update_task(&self, id: DbId, changes: &TaskChanges) -> StoreResult<Option<Task>>;
}

/// A backend that serves every component.
pub trait Store: EmployeeStore + TimeEntryStore + SessionStore + TaskStore {}

impl<T> Store for T where T: EmployeeStore + TimeEntryStore + SessionStore + TaskStore {}
