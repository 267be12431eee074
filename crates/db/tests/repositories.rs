//! Integration tests for the repository layer against a real database.
//!
//! These need `DATABASE_URL` pointing at a Postgres server the test user may
//! create databases on. Run with `cargo test -p workforce-db -- --ignored`.
//!
//! Covers:
//! - The email and single-active-entry unique constraints fire with the
//!   names the engine classifies on
//! - Completing an entry is a one-shot transition
//! - Task counts and the `completed_at` tri-state update

use chrono::{Duration, TimeZone, Utc};
use sqlx::PgPool;
use workforce_core::attendance::{Location, NewTimeEntry, TimeEntryStatus};
use workforce_core::employee::{EmployeeChanges, NewEmployee};
use workforce_core::roles::Role;
use workforce_core::session::NewLoginSession;
use workforce_core::task::{NewTask, Task, TaskChanges, TaskCounts, TaskPriority, TaskStatus};
use workforce_core::types::{DbId, Timestamp};
use workforce_db::constraints;
use workforce_db::repositories::{EmployeeRepo, LoginSessionRepo, TaskRepo, TimeEntryRepo};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
}

fn new_employee(email: &str) -> NewEmployee {
    NewEmployee {
        email: email.to_string(),
        password_hash: "$argon2id$placeholder".to_string(),
        first_name: "Jane".to_string(),
        last_name: "Employee".to_string(),
        role: Role::Employee,
        department: "Engineering".to_string(),
        position: "Developer".to_string(),
        avatar: None,
        created_at: t0(),
    }
}

fn active_entry(employee_id: DbId, clock_in: Timestamp) -> NewTimeEntry {
    NewTimeEntry {
        employee_id,
        clock_in,
        clock_out: None,
        location: Location::new(40.0, -74.0).with_address("HQ"),
        notes: None,
        total_hours: None,
        status: TimeEntryStatus::Active,
        created_at: clock_in,
    }
}

fn unique_constraint(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            db.constraint().map(str::to_string)
        }
        _ => None,
    }
}

async fn seed_employee(pool: &PgPool, email: &str) -> DbId {
    EmployeeRepo::create(pool, &new_employee(email))
        .await
        .unwrap()
        .id
}

// ---------------------------------------------------------------------------
// Test: duplicate email violates uq_employees_email
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn duplicate_email_names_constraint(pool: PgPool) {
    seed_employee(&pool, "jane@company.com").await;

    let err = EmployeeRepo::create(&pool, &new_employee("jane@company.com"))
        .await
        .unwrap_err();
    assert_eq!(
        unique_constraint(&err).as_deref(),
        Some(constraints::UQ_EMPLOYEES_EMAIL)
    );
}

// ---------------------------------------------------------------------------
// Test: deactivation is idempotent and hides from list_active
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn deactivate_hides_from_active_list(pool: PgPool) {
    let id = seed_employee(&pool, "jane@company.com").await;
    seed_employee(&pool, "john@company.com").await;
    assert_eq!(EmployeeRepo::count_active(&pool).await.unwrap(), 2);

    let deactivate = EmployeeChanges {
        is_active: Some(false),
        updated_at: Some(t0() + Duration::days(1)),
        ..Default::default()
    };
    for _ in 0..2 {
        let row = EmployeeRepo::update(&pool, id, &deactivate)
            .await
            .unwrap()
            .expect("employee exists");
        assert!(!row.is_active);
        assert_eq!(row.email, "jane@company.com");
    }

    let active = EmployeeRepo::list_active(&pool).await.unwrap();
    assert!(!active.iter().any(|e| e.id == id));
    assert_eq!(EmployeeRepo::count_active(&pool).await.unwrap(), 1);
    assert!(EmployeeRepo::update(&pool, 9999, &deactivate)
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Test: a second ACTIVE entry violates the partial unique index
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn second_active_entry_names_constraint(pool: PgPool) {
    let id = seed_employee(&pool, "jane@company.com").await;
    TimeEntryRepo::create(&pool, &active_entry(id, t0()))
        .await
        .unwrap();

    let err = TimeEntryRepo::create(&pool, &active_entry(id, t0() + Duration::minutes(5)))
        .await
        .unwrap_err();
    assert_eq!(
        unique_constraint(&err).as_deref(),
        Some(constraints::UQ_TIME_ENTRIES_ACTIVE_EMPLOYEE)
    );
}

// ---------------------------------------------------------------------------
// Test: complete only applies once
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn complete_is_one_shot(pool: PgPool) {
    let id = seed_employee(&pool, "jane@company.com").await;
    let entry = TimeEntryRepo::create(&pool, &active_entry(id, t0()))
        .await
        .unwrap();

    let done = TimeEntryRepo::complete(&pool, entry.id, t0() + Duration::hours(8), 8.0)
        .await
        .unwrap()
        .expect("entry was active");
    assert_eq!(done.status, "COMPLETED");
    assert_eq!(done.total_hours, Some(8.0));

    let again = TimeEntryRepo::complete(&pool, entry.id, t0() + Duration::hours(9), 9.0)
        .await
        .unwrap();
    assert!(again.is_none());
    assert!(TimeEntryRepo::find_active(&pool, id).await.unwrap().is_none());

    // A new shift may start once the previous one is completed.
    TimeEntryRepo::create(&pool, &active_entry(id, t0() + Duration::hours(10)))
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: list_clocked_in_between honours the half-open window
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn window_listing_is_half_open(pool: PgPool) {
    let id = seed_employee(&pool, "jane@company.com").await;
    let start = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
    let end = start + Duration::hours(24);
    for clock_in in [start, start + Duration::hours(12), end] {
        let entry = TimeEntryRepo::create(&pool, &active_entry(id, clock_in))
            .await
            .unwrap();
        TimeEntryRepo::complete(&pool, entry.id, clock_in + Duration::hours(1), 1.0)
            .await
            .unwrap();
    }

    let rows = TimeEntryRepo::list_clocked_in_between(&pool, start, end, Some(id))
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].clock_in, start + Duration::hours(12));
}

// ---------------------------------------------------------------------------
// Test: end_all_for_employee closes every open session
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn end_all_closes_sessions(pool: PgPool) {
    let id = seed_employee(&pool, "jane@company.com").await;
    for minutes in [0, 5] {
        LoginSessionRepo::create(
            &pool,
            &NewLoginSession {
                employee_id: id,
                login_time: t0() + Duration::minutes(minutes),
                ip_address: "10.0.0.1".into(),
                user_agent: "test".into(),
                location: None,
            },
        )
        .await
        .unwrap();
    }
    assert_eq!(LoginSessionRepo::online_employee_ids(&pool).await.unwrap(), vec![id]);

    let ended = LoginSessionRepo::end_all_for_employee(&pool, id, t0() + Duration::hours(1))
        .await
        .unwrap();
    assert_eq!(ended, 2);
    assert!(LoginSessionRepo::online_employee_ids(&pool).await.unwrap().is_empty());
    assert_eq!(
        LoginSessionRepo::end_all_for_employee(&pool, id, t0()).await.unwrap(),
        0
    );
}

// ---------------------------------------------------------------------------
// Test: task counts and completed_at tri-state
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
#[ignore = "requires DATABASE_URL"]
async fn task_status_updates_stamp_and_count(pool: PgPool) {
    let manager = seed_employee(&pool, "boss@company.com").await;
    let worker = seed_employee(&pool, "jane@company.com").await;
    let row = TaskRepo::create(
        &pool,
        &NewTask {
            title: "Inventory".into(),
            description: "Count the stock".into(),
            assigned_to: worker,
            assigned_by: manager,
            priority: TaskPriority::High,
            due_date: t0() + Duration::days(2),
            estimated_hours: Some(3.0),
            tags: ["warehouse".to_string()].into_iter().collect(),
            created_at: t0(),
        },
    )
    .await
    .unwrap();
    let task = Task::try_from(row).unwrap();
    assert_eq!(task.status, TaskStatus::Pending);

    let now = t0() + Duration::hours(4);
    let changes = TaskChanges::status_only(&task, TaskStatus::Completed, now);
    let done = Task::try_from(TaskRepo::update(&pool, task.id, &changes).await.unwrap().unwrap())
        .unwrap();
    assert_eq!(done.completed_at, Some(now));

    let counts: TaskCounts = TaskRepo::counts(&pool, Some(worker)).await.unwrap().into();
    assert_eq!(counts.total, 1);
    assert_eq!(counts.completed, 1);

    let reopened = TaskChanges::status_only(&done, TaskStatus::InProgress, now);
    let row = TaskRepo::update(&pool, task.id, &reopened).await.unwrap().unwrap();
    assert_eq!(row.status, "IN_PROGRESS");
    assert!(row.completed_at.is_none());
}
