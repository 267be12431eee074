//! In-process store.
//!
//! All tables sit behind a single `RwLock`, so every write (including the
//! active-entry check plus insert) is serialized. Ids start at 1 per table.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use workforce_core::attendance::{NewTimeEntry, TimeEntry, TimeEntryStatus, UpdateTimeEntry};
use workforce_core::employee::{Employee, EmployeeAccount, EmployeeChanges, NewEmployee};
use workforce_core::session::{self, LoginSession, NewLoginSession};
use workforce_core::task::{NewTask, Task, TaskChanges, TaskCounts, TaskStatus};
use workforce_core::types::{DbId, Timestamp};
use workforce_db::constraints::{UQ_EMPLOYEES_EMAIL, UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE};

use super::{EmployeeStore, SessionStore, StoreError, StoreResult, TaskStore, TimeEntryStore};

struct Table<T> {
    rows: BTreeMap<DbId, T>,
    last_id: DbId,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T> Table<T> {
    fn next_id(&mut self) -> DbId {
        self.last_id += 1;
        self.last_id
    }
}

#[derive(Default)]
struct Tables {
    employees: Table<EmployeeAccount>,
    time_entries: Table<TimeEntry>,
    sessions: Table<LoginSession>,
    tasks: Table<Task>,
}

impl Tables {
    fn email_taken(&self, email: &str, except: Option<DbId>) -> bool {
        self.employees
            .rows
            .values()
            .any(|a| a.employee.email == email && Some(a.employee.id) != except)
    }

    fn has_active_entry(&self, employee_id: DbId, except: Option<DbId>) -> bool {
        self.time_entries
            .rows
            .values()
            .any(|e| e.employee_id == employee_id && e.is_active() && Some(e.id) != except)
    }
}

fn violation(constraint: &str) -> StoreError {
    StoreError::UniqueViolation {
        constraint: constraint.to_string(),
    }
}

/// Thread-safe in-memory backend. Share it behind an `Arc`.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

#[async_trait]
impl EmployeeStore for MemoryStore {
    async fn insert_employee(&self, input: &NewEmployee) -> StoreResult<Employee> {
        let mut tables = self.tables.write().await;
        if tables.email_taken(&input.email, None) {
            return Err(violation(UQ_EMPLOYEES_EMAIL));
        }
        let id = tables.employees.next_id();
        let employee = Employee {
            id,
            email: input.email.clone(),
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            role: input.role,
            department: input.department.clone(),
            position: input.position.clone(),
            avatar: input.avatar.clone(),
            is_active: true,
            created_at: input.created_at,
            updated_at: input.created_at,
        };
        tables.employees.rows.insert(
            id,
            EmployeeAccount {
                employee: employee.clone(),
                password_hash: input.password_hash.clone(),
            },
        );
        Ok(employee)
    }

    async fn employee_by_id(&self, id: DbId) -> StoreResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.rows.get(&id).map(|a| a.employee.clone()))
    }

    async fn account_by_email(&self, email: &str) -> StoreResult<Option<EmployeeAccount>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .rows
            .values()
            .find(|a| a.employee.email == email)
            .cloned())
    }

    async fn active_employees(&self) -> StoreResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        let mut employees: Vec<Employee> = tables
            .employees
            .rows
            .values()
            .filter(|a| a.employee.is_active)
            .map(|a| a.employee.clone())
            .collect();
        employees.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(employees)
    }

    async fn count_active_employees(&self) -> StoreResult<i64> {
        let tables = self.tables.read().await;
        let count = tables
            .employees
            .rows
            .values()
            .filter(|a| a.employee.is_active)
            .count();
        Ok(count as i64)
    }

    async fn update_employee(
        &self,
        id: DbId,
        changes: &EmployeeChanges,
    ) -> StoreResult<Option<Employee>> {
        let mut tables = self.tables.write().await;
        if !tables.employees.rows.contains_key(&id) {
            return Ok(None);
        }
        if let Some(email) = &changes.email {
            if tables.email_taken(email, Some(id)) {
                return Err(violation(UQ_EMPLOYEES_EMAIL));
            }
        }
        let Some(account) = tables.employees.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(&mut account.employee);
        if let Some(hash) = &changes.password_hash {
            account.password_hash = hash.clone();
        }
        Ok(Some(account.employee.clone()))
    }
}

// ---------------------------------------------------------------------------
// Time entries
// ---------------------------------------------------------------------------

fn newest_clock_in_first(entries: &mut [TimeEntry]) {
    entries.sort_by(|a, b| b.clock_in.cmp(&a.clock_in).then(b.id.cmp(&a.id)));
}

#[async_trait]
impl TimeEntryStore for MemoryStore {
    async fn insert_time_entry(&self, input: &NewTimeEntry) -> StoreResult<TimeEntry> {
        let mut tables = self.tables.write().await;
        if input.status == TimeEntryStatus::Active
            && tables.has_active_entry(input.employee_id, None)
        {
            return Err(violation(UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE));
        }
        let id = tables.time_entries.next_id();
        let entry = TimeEntry {
            id,
            employee_id: input.employee_id,
            clock_in: input.clock_in,
            clock_out: input.clock_out,
            latitude: input.location.latitude,
            longitude: input.location.longitude,
            address: input.location.address.clone(),
            notes: input.notes.clone(),
            total_hours: input.total_hours,
            status: input.status,
            created_at: input.created_at,
        };
        tables.time_entries.rows.insert(id, entry.clone());
        Ok(entry)
    }

    async fn time_entry_by_id(&self, id: DbId) -> StoreResult<Option<TimeEntry>> {
        let tables = self.tables.read().await;
        Ok(tables.time_entries.rows.get(&id).cloned())
    }

    async fn active_time_entry(&self, employee_id: DbId) -> StoreResult<Option<TimeEntry>> {
        let tables = self.tables.read().await;
        Ok(tables
            .time_entries
            .rows
            .values()
            .find(|e| e.employee_id == employee_id && e.is_active())
            .cloned())
    }

    async fn time_entries(&self, employee_id: Option<DbId>) -> StoreResult<Vec<TimeEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<TimeEntry> = tables
            .time_entries
            .rows
            .values()
            .filter(|e| employee_id.map_or(true, |id| e.employee_id == id))
            .cloned()
            .collect();
        newest_clock_in_first(&mut entries);
        Ok(entries)
    }

    async fn time_entries_clocked_in_between(
        &self,
        start: Timestamp,
        end: Timestamp,
        employee_id: Option<DbId>,
    ) -> StoreResult<Vec<TimeEntry>> {
        let tables = self.tables.read().await;
        let mut entries: Vec<TimeEntry> = tables
            .time_entries
            .rows
            .values()
            .filter(|e| e.clock_in >= start && e.clock_in < end)
            .filter(|e| employee_id.map_or(true, |id| e.employee_id == id))
            .cloned()
            .collect();
        newest_clock_in_first(&mut entries);
        Ok(entries)
    }

    async fn complete_time_entry(
        &self,
        id: DbId,
        clock_out: Timestamp,
        total_hours: f64,
    ) -> StoreResult<Option<TimeEntry>> {
        let mut tables = self.tables.write().await;
        let Some(entry) = tables.time_entries.rows.get_mut(&id).filter(|e| e.is_active()) else {
            return Ok(None);
        };
        entry.clock_out = Some(clock_out);
        entry.total_hours = Some(total_hours);
        entry.status = TimeEntryStatus::Completed;
        Ok(Some(entry.clone()))
    }

    async fn update_time_entry(
        &self,
        id: DbId,
        changes: &UpdateTimeEntry,
    ) -> StoreResult<Option<TimeEntry>> {
        let mut tables = self.tables.write().await;
        let Some(current) = tables.time_entries.rows.get(&id) else {
            return Ok(None);
        };
        let mut updated = current.clone();
        changes.apply_to(&mut updated);
        if updated.is_active() && tables.has_active_entry(updated.employee_id, Some(id)) {
            return Err(violation(UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE));
        }
        tables.time_entries.rows.insert(id, updated.clone());
        Ok(Some(updated))
    }
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[async_trait]
impl SessionStore for MemoryStore {
    async fn insert_session(&self, input: &NewLoginSession) -> StoreResult<LoginSession> {
        let mut tables = self.tables.write().await;
        let id = tables.sessions.next_id();
        let session = LoginSession {
            id,
            employee_id: input.employee_id,
            login_time: input.login_time,
            logout_time: None,
            ip_address: input.ip_address.clone(),
            user_agent: input.user_agent.clone(),
            location: input.location.clone(),
            is_active: true,
        };
        tables.sessions.rows.insert(id, session.clone());
        Ok(session)
    }

    async fn end_sessions(&self, employee_id: DbId, logout_time: Timestamp) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let mut closed = 0;
        for session in tables
            .sessions
            .rows
            .values_mut()
            .filter(|s| s.employee_id == employee_id && s.is_active)
        {
            session.is_active = false;
            session.logout_time = Some(logout_time);
            closed += 1;
        }
        Ok(closed)
    }

    async fn sessions(&self) -> StoreResult<Vec<LoginSession>> {
        let tables = self.tables.read().await;
        let mut sessions: Vec<LoginSession> = tables.sessions.rows.values().cloned().collect();
        sessions.sort_by(|a, b| b.login_time.cmp(&a.login_time).then(b.id.cmp(&a.id)));
        Ok(sessions)
    }

    async fn online_employee_ids(&self) -> StoreResult<Vec<DbId>> {
        let sessions = self.sessions().await?;
        Ok(session::online_employee_ids(&sessions))
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

#[async_trait]
impl TaskStore for MemoryStore {
    async fn insert_task(&self, input: &NewTask) -> StoreResult<Task> {
        let mut tables = self.tables.write().await;
        let id = tables.tasks.next_id();
        let task = Task {
            id,
            title: input.title.clone(),
            description: input.description.clone(),
            assigned_to: input.assigned_to,
            assigned_by: input.assigned_by,
            priority: input.priority,
            status: TaskStatus::Pending,
            due_date: input.due_date,
            completed_at: None,
            estimated_hours: input.estimated_hours,
            actual_hours: None,
            tags: input.tags.clone(),
            created_at: input.created_at,
            updated_at: input.created_at,
        };
        tables.tasks.rows.insert(id, task.clone());
        Ok(task)
    }

    async fn task_by_id(&self, id: DbId) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables.tasks.rows.get(&id).cloned())
    }

    async fn tasks(&self, assigned_to: Option<DbId>) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;
        let mut tasks: Vec<Task> = tables
            .tasks
            .rows
            .values()
            .filter(|t| assigned_to.map_or(true, |id| t.assigned_to == id))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn task_counts(&self, assigned_to: Option<DbId>) -> StoreResult<TaskCounts> {
        let tables = self.tables.read().await;
        Ok(TaskCounts::tally(
            tables
                .tasks
                .rows
                .values()
                .filter(|t| assigned_to.map_or(true, |id| t.assigned_to == id)),
        ))
    }

    async fn update_task(&self, id: DbId, changes: &TaskChanges) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;
        let Some(task) = tables.tasks.rows.get_mut(&id) else {
            return Ok(None);
        };
        changes.apply_to(task);
        Ok(Some(task.clone()))
    }
}
