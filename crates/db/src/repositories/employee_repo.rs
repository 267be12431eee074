//! Repository for the `employees` table.

use sqlx::PgPool;
use workforce_core::employee::{EmployeeChanges, NewEmployee};
use workforce_core::types::DbId;

use crate::models::employee::EmployeeRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, password_hash, first_name, last_name, role, department, \
                       position, avatar, is_active, created_at, updated_at";

/// Provides CRUD operations for employees. Rows are never deleted.
pub struct EmployeeRepo;

impl EmployeeRepo {
    /// Insert a new employee, returning the created row.
    ///
    /// Fails with a unique violation on `uq_employees_email` for a taken email.
    pub async fn create(pool: &PgPool, input: &NewEmployee) -> Result<EmployeeRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO employees
                (email, password_hash, first_name, last_name, role, department, position,
                 avatar, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.as_str())
            .bind(&input.department)
            .bind(&input.position)
            .bind(&input.avatar)
            .bind(input.created_at)
            .fetch_one(pool)
            .await
    }

    /// Find an employee by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE id = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an employee by email (exact, case-sensitive).
    pub async fn find_by_email(
        pool: &PgPool,
        email: &str,
    ) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM employees WHERE email = $1");
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(email)
            .fetch_optional(pool)
            .await
    }

    /// List active employees, most recently created first.
    pub async fn list_active(pool: &PgPool) -> Result<Vec<EmployeeRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM employees WHERE is_active = true
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, EmployeeRow>(&query).fetch_all(pool).await
    }

    /// Count employees with the active flag set.
    pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM employees WHERE is_active = true")
                .fetch_one(pool)
                .await?;
        Ok(count)
    }

    /// Update an employee. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &EmployeeChanges,
    ) -> Result<Option<EmployeeRow>, sqlx::Error> {
        let query = format!(
            "UPDATE employees SET
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                first_name = COALESCE($4, first_name),
                last_name = COALESCE($5, last_name),
                role = COALESCE($6, role),
                department = COALESCE($7, department),
                position = COALESCE($8, position),
                avatar = COALESCE($9, avatar),
                is_active = COALESCE($10, is_active),
                updated_at = COALESCE($11, updated_at)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EmployeeRow>(&query)
            .bind(id)
            .bind(&input.email)
            .bind(&input.password_hash)
            .bind(&input.first_name)
            .bind(&input.last_name)
            .bind(input.role.map(|r| r.as_str()))
            .bind(&input.department)
            .bind(&input.position)
            .bind(&input.avatar)
            .bind(input.is_active)
            .bind(input.updated_at)
            .fetch_optional(pool)
            .await
    }
}
