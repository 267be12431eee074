//! Task row model.

use sqlx::FromRow;
use workforce_core::error::CoreError;
use workforce_core::task::{Task, TaskCounts, TaskPriority, TaskStatus};
use workforce_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow)]
pub struct TaskRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub priority: String,
    pub status: String,
    pub due_date: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Vec<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<TaskRow> for Task {
    type Error = CoreError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: row.id,
            title: row.title,
            description: row.description,
            assigned_to: row.assigned_to,
            assigned_by: row.assigned_by,
            priority: TaskPriority::from_str(&row.priority)?,
            status: TaskStatus::from_str(&row.status)?,
            due_date: row.due_date,
            completed_at: row.completed_at,
            estimated_hours: row.estimated_hours,
            actual_hours: row.actual_hours,
            tags: row.tags.into_iter().collect(),
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Aggregate row produced by `TaskRepo::counts`.
#[derive(Debug, Clone, Copy, FromRow)]
pub struct TaskCountsRow {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl From<TaskCountsRow> for TaskCounts {
    fn from(row: TaskCountsRow) -> Self {
        TaskCounts {
            total: row.total,
            pending: row.pending,
            in_progress: row.in_progress,
            completed: row.completed,
            cancelled: row.cancelled,
        }
    }
}
