//! PostgreSQL persistence for employees, time entries, login sessions and tasks.

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Names of the unique constraints the domain layer translates into conflicts.
pub mod constraints {
    /// `employees.email` must be unique.
    pub const UQ_EMPLOYEES_EMAIL: &str = "uq_employees_email";

    /// Partial unique index: one `ACTIVE` time entry per employee.
    pub const UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE: &str = "uq_time_entries_active_employee";
}

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply any pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::debug!("Migrations up to date");
    Ok(())
}
