//! Repository for the `login_sessions` table.

use sqlx::PgPool;
use workforce_core::session::NewLoginSession;
use workforce_core::types::{DbId, Timestamp};

use crate::models::login_session::LoginSessionRow;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, employee_id, login_time, logout_time, ip_address, user_agent, \
                       latitude, longitude, address, is_active";

/// Provides CRUD operations for login sessions.
pub struct LoginSessionRepo;

impl LoginSessionRepo {
    /// Insert a new active session, returning the created row.
    pub async fn create(
        pool: &PgPool,
        input: &NewLoginSession,
    ) -> Result<LoginSessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO login_sessions
                (employee_id, login_time, ip_address, user_agent, latitude, longitude, address)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let location = input.location.as_ref();
        sqlx::query_as::<_, LoginSessionRow>(&query)
            .bind(input.employee_id)
            .bind(input.login_time)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .bind(location.map(|l| l.latitude))
            .bind(location.map(|l| l.longitude))
            .bind(location.and_then(|l| l.address.as_deref()))
            .fetch_one(pool)
            .await
    }

    /// Close every active session for an employee. Returns the count closed.
    pub async fn end_all_for_employee(
        pool: &PgPool,
        employee_id: DbId,
        logout_time: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE login_sessions SET logout_time = $2, is_active = false
             WHERE employee_id = $1 AND is_active = true",
        )
        .bind(employee_id)
        .bind(logout_time)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// List all sessions, most recent login first.
    pub async fn list(pool: &PgPool) -> Result<Vec<LoginSessionRow>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM login_sessions ORDER BY login_time DESC, id DESC");
        sqlx::query_as::<_, LoginSessionRow>(&query)
            .fetch_all(pool)
            .await
    }

    /// Distinct employees with at least one active session, most recent
    /// login first.
    pub async fn online_employee_ids(pool: &PgPool) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT employee_id FROM login_sessions
             WHERE is_active = true
             GROUP BY employee_id
             ORDER BY MAX(login_time) DESC, employee_id",
        )
        .fetch_all(pool)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
