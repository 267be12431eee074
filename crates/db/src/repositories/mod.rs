//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod employee_repo;
pub mod login_session_repo;
pub mod task_repo;
pub mod time_entry_repo;

pub use employee_repo::EmployeeRepo;
pub use login_session_repo::LoginSessionRepo;
pub use task_repo::TaskRepo;
pub use time_entry_repo::TimeEntryRepo;
