//! Repository for the `tasks` table.

use sqlx::PgPool;
use workforce_core::task::{
    NewTask, TaskChanges, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_IN_PROGRESS, STATUS_PENDING,
};
use workforce_core::types::DbId;

use crate::models::task::{TaskCountsRow, TaskRow};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, assigned_to, assigned_by, priority, status, \
                       due_date, completed_at, estimated_hours, actual_hours, tags, \
                       created_at, updated_at";

/// Provides CRUD operations for tasks.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new `PENDING` task, returning the created row.
    pub async fn create(pool: &PgPool, input: &NewTask) -> Result<TaskRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks
                (title, description, assigned_to, assigned_by, priority, status, due_date,
                 estimated_hours, tags, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, '{STATUS_PENDING}', $6, $7, $8, $9, $9)
             RETURNING {COLUMNS}"
        );
        let tags: Vec<String> = input.tags.iter().cloned().collect();
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assigned_to)
            .bind(input.assigned_by)
            .bind(input.priority.as_str())
            .bind(input.due_date)
            .bind(input.estimated_hours)
            .bind(tags)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find a task by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<TaskRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List tasks newest first, optionally only those assigned to one employee.
    pub async fn list(
        pool: &PgPool,
        assigned_to: Option<DbId>,
    ) -> Result<Vec<TaskRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::BIGINT IS NULL OR assigned_to = $1)
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(assigned_to)
            .fetch_all(pool)
            .await
    }

    /// Count tasks per status, optionally for one assignee.
    pub async fn counts(
        pool: &PgPool,
        assigned_to: Option<DbId>,
    ) -> Result<TaskCountsRow, sqlx::Error> {
        let query = format!(
            "SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = '{STATUS_PENDING}') AS pending,
                COUNT(*) FILTER (WHERE status = '{STATUS_IN_PROGRESS}') AS in_progress,
                COUNT(*) FILTER (WHERE status = '{STATUS_COMPLETED}') AS completed,
                COUNT(*) FILTER (WHERE status = '{STATUS_CANCELLED}') AS cancelled
             FROM tasks
             WHERE ($1::BIGINT IS NULL OR assigned_to = $1)"
        );
        sqlx::query_as::<_, TaskCountsRow>(&query)
            .bind(assigned_to)
            .fetch_one(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied;
    /// `completed_at` follows its tri-state encoding.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &TaskChanges,
    ) -> Result<Option<TaskRow>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                assigned_to = COALESCE($4, assigned_to),
                priority = COALESCE($5, priority),
                status = COALESCE($6, status),
                due_date = COALESCE($7, due_date),
                completed_at = CASE WHEN $8 THEN $9 ELSE completed_at END,
                estimated_hours = COALESCE($10, estimated_hours),
                actual_hours = COALESCE($11, actual_hours),
                tags = COALESCE($12, tags),
                updated_at = $13
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let tags: Option<Vec<String>> = input.tags.as_ref().map(|t| t.iter().cloned().collect());
        sqlx::query_as::<_, TaskRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.assigned_to)
            .bind(input.priority.map(|p| p.as_str()))
            .bind(input.status.map(|s| s.as_str()))
            .bind(input.due_date)
            .bind(input.completed_at.is_some())
            .bind(input.completed_at.flatten())
            .bind(input.estimated_hours)
            .bind(input.actual_hours)
            .bind(tags)
            .bind(input.updated_at)
            .fetch_optional(pool)
            .await
    }
}
