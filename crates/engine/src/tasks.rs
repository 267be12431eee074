//! Task assignment and status tracking.

use std::sync::Arc;

use workforce_core::clock::Clock;
use workforce_core::error::CoreError;
use workforce_core::task::{CreateTask, Task, TaskChanges, TaskCounts, TaskStatus, UpdateTask};
use workforce_core::types::DbId;

use crate::error::EngineResult;
use crate::store::{EmployeeStore, TaskStore};

pub struct TaskBoard {
    store: Arc<dyn TaskStore>,
    employees: Arc<dyn EmployeeStore>,
    clock: Arc<dyn Clock>,
}

fn not_found(id: DbId) -> CoreError {
    CoreError::NotFound { entity: "Task", id }
}

impl TaskBoard {
    pub fn new(
        store: Arc<dyn TaskStore>,
        employees: Arc<dyn EmployeeStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            employees,
            clock,
        }
    }

    /// Both ends of an assignment must be existing, active employees.
    async fn ensure_assignable(&self, role: &str, employee_id: DbId) -> EngineResult<()> {
        match self.employees.employee_by_id(employee_id).await? {
            Some(employee) if employee.is_active => Ok(()),
            Some(_) => Err(CoreError::InvalidAssignment(format!(
                "{role} {employee_id} is not an active employee"
            ))
            .into()),
            None => Err(CoreError::InvalidAssignment(format!(
                "{role} {employee_id} does not exist"
            ))
            .into()),
        }
    }

    /// Create a `PENDING` task.
    pub async fn create(&self, input: CreateTask) -> EngineResult<Task> {
        let new_task = input.into_new_task(self.clock.now())?;
        self.ensure_assignable("Assignee", new_task.assigned_to).await?;
        self.ensure_assignable("Assigner", new_task.assigned_by).await?;

        let task = self.store.insert_task(&new_task).await?;
        tracing::info!(
            task_id = task.id,
            assigned_to = task.assigned_to,
            assigned_by = task.assigned_by,
            priority = task.priority.as_str(),
            "Task created"
        );
        Ok(task)
    }

    pub async fn get(&self, task_id: DbId) -> EngineResult<Task> {
        self.store
            .task_by_id(task_id)
            .await?
            .ok_or_else(|| not_found(task_id).into())
    }

    /// Move a task to any status. Entering `COMPLETED` stamps
    /// `completed_at`; leaving it clears the stamp.
    pub async fn update_status(&self, task_id: DbId, status: TaskStatus) -> EngineResult<Task> {
        let current = self.get(task_id).await?;
        let changes = TaskChanges::status_only(&current, status, self.clock.now());
        let task = self
            .store
            .update_task(task_id, &changes)
            .await?
            .ok_or_else(|| not_found(task_id))?;

        tracing::info!(
            task_id,
            from = current.status.as_str(),
            to = task.status.as_str(),
            "Task status changed"
        );
        Ok(task)
    }

    /// Generic edit. A status change follows the same `completed_at` rule as
    /// [`update_status`](Self::update_status); a new assignee is re-checked.
    pub async fn update(&self, task_id: DbId, input: UpdateTask) -> EngineResult<Task> {
        let current = self.get(task_id).await?;
        if let Some(assignee) = input.assigned_to {
            if assignee != current.assigned_to {
                self.ensure_assignable("Assignee", assignee).await?;
            }
        }

        let changes = input.into_changes(&current, self.clock.now())?;
        let task = self
            .store
            .update_task(task_id, &changes)
            .await?
            .ok_or_else(|| not_found(task_id))?;

        tracing::info!(task_id, status = task.status.as_str(), "Task updated");
        Ok(task)
    }

    /// Newest created first. `None` lists every task.
    pub async fn list_for(&self, employee_id: Option<DbId>) -> EngineResult<Vec<Task>> {
        let tasks = self.store.tasks(employee_id).await?;
        tracing::debug!(?employee_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    pub async fn counts(&self, employee_id: Option<DbId>) -> EngineResult<TaskCounts> {
        Ok(self.store.task_counts(employee_id).await?)
    }
}
