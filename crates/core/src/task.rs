//! Task types and the status rule.
//!
//! Any status may follow any other status. The only rule attached to a
//! transition is the `completed_at` stamp, see [`next_completed_at`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const PRIORITY_LOW: &str = "LOW";
pub const PRIORITY_MEDIUM: &str = "MEDIUM";
pub const PRIORITY_HIGH: &str = "HIGH";
pub const PRIORITY_URGENT: &str = "URGENT";

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
pub const STATUS_COMPLETED: &str = "COMPLETED";
pub const STATUS_CANCELLED: &str = "CANCELLED";

/// All valid task status names.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_PROGRESS,
    STATUS_COMPLETED,
    STATUS_CANCELLED,
];

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => PRIORITY_LOW,
            Self::Medium => PRIORITY_MEDIUM,
            Self::High => PRIORITY_HIGH,
            Self::Urgent => PRIORITY_URGENT,
        }
    }

    /// Parse from a string, returning an error for unknown priorities.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            PRIORITY_LOW => Ok(Self::Low),
            PRIORITY_MEDIUM => Ok(Self::Medium),
            PRIORITY_HIGH => Ok(Self::High),
            PRIORITY_URGENT => Ok(Self::Urgent),
            other => Err(CoreError::Validation(format!(
                "Unknown task priority: '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    /// Return the database string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => STATUS_PENDING,
            Self::InProgress => STATUS_IN_PROGRESS,
            Self::Completed => STATUS_COMPLETED,
            Self::Cancelled => STATUS_CANCELLED,
        }
    }

    /// Parse from a string, returning an error for unknown statuses.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            STATUS_PENDING => Ok(Self::Pending),
            STATUS_IN_PROGRESS => Ok(Self::InProgress),
            STATUS_COMPLETED => Ok(Self::Completed),
            STATUS_CANCELLED => Ok(Self::Cancelled),
            other => Err(CoreError::Validation(format!(
                "Unknown task status: '{other}'. Valid statuses: {}",
                VALID_STATUSES.join(", ")
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Entities and DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub due_date: Timestamp,
    /// Present exactly when `status` is `Completed`.
    pub completed_at: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: BTreeSet<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Task submitted by an assigner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    /// Defaults to `Medium`.
    pub priority: Option<TaskPriority>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreateTask {
    /// Check required fields and turn into a store insert.
    pub fn into_new_task(self, created_at: Timestamp) -> Result<NewTask, CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::missing_field("title"));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::missing_field("description"));
        }
        let due_date = self
            .due_date
            .ok_or_else(|| CoreError::missing_field("due_date"))?;
        validate_hours("estimated_hours", self.estimated_hours)?;

        Ok(NewTask {
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            assigned_by: self.assigned_by,
            priority: self.priority.unwrap_or_default(),
            due_date,
            estimated_hours: self.estimated_hours,
            tags: normalize_tags(self.tags),
            created_at,
        })
    }
}

/// Store-level insert. Status starts as `Pending`.
#[derive(Debug, Clone)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub assigned_to: DbId,
    pub assigned_by: DbId,
    pub priority: TaskPriority,
    pub due_date: Timestamp,
    pub estimated_hours: Option<f64>,
    pub tags: BTreeSet<String>,
    pub created_at: Timestamp,
}

/// Generic task edit. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Timestamp>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<Vec<String>>,
}

impl UpdateTask {
    /// Resolve this edit against the current task into store-level changes,
    /// applying the `completed_at` rule when the status is touched.
    pub fn into_changes(self, current: &Task, now: Timestamp) -> Result<TaskChanges, CoreError> {
        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(CoreError::Validation("title must not be empty".into()));
        }
        if self.description.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(CoreError::Validation("description must not be empty".into()));
        }
        validate_hours("estimated_hours", self.estimated_hours)?;
        validate_hours("actual_hours", self.actual_hours)?;

        let completed_at = self
            .status
            .map(|next| next_completed_at(current.status, current.completed_at, next, now));

        Ok(TaskChanges {
            title: self.title,
            description: self.description,
            assigned_to: self.assigned_to,
            priority: self.priority,
            status: self.status,
            due_date: self.due_date,
            completed_at,
            estimated_hours: self.estimated_hours,
            actual_hours: self.actual_hours,
            tags: self.tags.map(normalize_tags),
            updated_at: now,
        })
    }
}

/// Store-level partial update.
///
/// `completed_at` is tri-state: `None` leaves it alone, `Some(None)` clears it,
/// `Some(Some(t))` stamps it.
#[derive(Debug, Clone)]
pub struct TaskChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub assigned_to: Option<DbId>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Option<Timestamp>>,
    pub estimated_hours: Option<f64>,
    pub actual_hours: Option<f64>,
    pub tags: Option<BTreeSet<String>>,
    pub updated_at: Timestamp,
}

impl TaskChanges {
    /// Changes that only move the status.
    pub fn status_only(current: &Task, next: TaskStatus, now: Timestamp) -> Self {
        Self {
            title: None,
            description: None,
            assigned_to: None,
            priority: None,
            status: Some(next),
            due_date: None,
            completed_at: Some(next_completed_at(
                current.status,
                current.completed_at,
                next,
                now,
            )),
            estimated_hours: None,
            actual_hours: None,
            tags: None,
            updated_at: now,
        }
    }

    pub fn apply_to(&self, task: &mut Task) {
        if let Some(title) = &self.title {
            task.title = title.clone();
        }
        if let Some(description) = &self.description {
            task.description = description.clone();
        }
        if let Some(assigned_to) = self.assigned_to {
            task.assigned_to = assigned_to;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = due_date;
        }
        if let Some(completed_at) = self.completed_at {
            task.completed_at = completed_at;
        }
        if let Some(estimated_hours) = self.estimated_hours {
            task.estimated_hours = Some(estimated_hours);
        }
        if let Some(actual_hours) = self.actual_hours {
            task.actual_hours = Some(actual_hours);
        }
        if let Some(tags) = &self.tags {
            task.tags = tags.clone();
        }
        task.updated_at = self.updated_at;
    }
}

/// Task tallies for one assignee or the whole company.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskCounts {
    pub total: i64,
    pub pending: i64,
    pub in_progress: i64,
    pub completed: i64,
    pub cancelled: i64,
}

impl TaskCounts {
    pub fn tally<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut counts = Self::default();
        for task in tasks {
            counts.total += 1;
            match task.status {
                TaskStatus::Pending => counts.pending += 1,
                TaskStatus::InProgress => counts.in_progress += 1,
                TaskStatus::Completed => counts.completed += 1,
                TaskStatus::Cancelled => counts.cancelled += 1,
            }
        }
        counts
    }

    /// Pending plus in-progress.
    pub fn open(&self) -> i64 {
        self.pending + self.in_progress
    }
}

// ---------------------------------------------------------------------------
// Rules
// ---------------------------------------------------------------------------

/// The `completed_at` value after moving from `prior` to `next`.
///
/// Entering `Completed` stamps `now`; staying `Completed` keeps the original
/// stamp; any other target clears it.
pub fn next_completed_at(
    prior: TaskStatus,
    prior_completed_at: Option<Timestamp>,
    next: TaskStatus,
    now: Timestamp,
) -> Option<Timestamp> {
    match (prior, next) {
        (TaskStatus::Completed, TaskStatus::Completed) => prior_completed_at.or(Some(now)),
        (_, TaskStatus::Completed) => Some(now),
        _ => None,
    }
}

/// Trim, drop empty tags and de-duplicate (case preserved).
pub fn normalize_tags(tags: Vec<String>) -> BTreeSet<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

fn validate_hours(field: &str, hours: Option<f64>) -> Result<(), CoreError> {
    match hours {
        Some(h) if !h.is_finite() || h < 0.0 => Err(CoreError::Validation(format!(
            "{field} must be a non-negative number"
        ))),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 3, 2, 12, 0, 0).unwrap()
    }

    fn task(status: TaskStatus, completed_at: Option<Timestamp>) -> Task {
        Task {
            id: 1,
            title: "Quarterly report".into(),
            description: "Compile figures".into(),
            assigned_to: 2,
            assigned_by: 1,
            priority: TaskPriority::High,
            status,
            due_date: now() + Duration::days(3),
            completed_at,
            estimated_hours: Some(4.0),
            actual_hours: None,
            tags: BTreeSet::new(),
            created_at: now(),
            updated_at: now(),
        }
    }

    fn create() -> CreateTask {
        CreateTask {
            title: "Quarterly report".into(),
            description: "Compile figures".into(),
            assigned_to: 2,
            assigned_by: 1,
            priority: None,
            due_date: Some(now() + Duration::days(3)),
            estimated_hours: Some(4.0),
            tags: vec!["Finance".into(), " finance ".into(), "Finance".into(), "".into()],
        }
    }

    // -----------------------------------------------------------------------
    // completed_at rule
    // -----------------------------------------------------------------------

    #[test]
    fn entering_completed_stamps_now() {
        let stamp = next_completed_at(TaskStatus::InProgress, None, TaskStatus::Completed, now());
        assert_eq!(stamp, Some(now()));
    }

    #[test]
    fn staying_completed_keeps_original_stamp() {
        let earlier = now() - Duration::hours(5);
        let stamp = next_completed_at(
            TaskStatus::Completed,
            Some(earlier),
            TaskStatus::Completed,
            now(),
        );
        assert_eq!(stamp, Some(earlier));
    }

    #[test]
    fn leaving_completed_clears_stamp() {
        for next in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Cancelled] {
            assert_eq!(
                next_completed_at(TaskStatus::Completed, Some(now()), next, now()),
                None
            );
        }
    }

    #[test]
    fn any_status_may_follow_any_status() {
        let mut t = task(TaskStatus::Completed, Some(now()));
        for next in [
            TaskStatus::Pending,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
            TaskStatus::Completed,
        ] {
            TaskChanges::status_only(&t, next, now()).apply_to(&mut t);
            assert_eq!(t.status, next);
            assert_eq!(t.completed_at.is_some(), next == TaskStatus::Completed);
        }
    }

    #[test]
    fn edit_without_status_leaves_stamp_alone() {
        let t = task(TaskStatus::Completed, Some(now()));
        let changes = UpdateTask {
            title: Some("Renamed".into()),
            ..Default::default()
        }
        .into_changes(&t, now())
        .unwrap();
        assert!(changes.completed_at.is_none());
    }

    // -----------------------------------------------------------------------
    // Creation
    // -----------------------------------------------------------------------

    #[test]
    fn create_defaults_priority_and_dedups_tags() {
        let new = create().into_new_task(now()).unwrap();
        assert_eq!(new.priority, TaskPriority::Medium);
        let tags: Vec<_> = new.tags.into_iter().collect();
        assert_eq!(tags, vec!["Finance".to_string(), "finance".to_string()]);
    }

    #[test]
    fn missing_title_rejected() {
        let mut input = create();
        input.title = "   ".into();
        let err = input.into_new_task(now()).unwrap_err();
        assert!(err.to_string().contains("title"));
    }

    #[test]
    fn missing_due_date_rejected() {
        let mut input = create();
        input.due_date = None;
        let err = input.into_new_task(now()).unwrap_err();
        assert!(err.to_string().contains("due_date"));
    }

    #[test]
    fn negative_estimate_rejected() {
        let mut input = create();
        input.estimated_hours = Some(-1.0);
        assert!(input.into_new_task(now()).is_err());
    }

    // -----------------------------------------------------------------------
    // Counts and parsing
    // -----------------------------------------------------------------------

    #[test]
    fn tally_counts_each_status() {
        let tasks = vec![
            task(TaskStatus::Pending, None),
            task(TaskStatus::InProgress, None),
            task(TaskStatus::Completed, Some(now())),
            task(TaskStatus::Cancelled, None),
            task(TaskStatus::Pending, None),
        ];
        let counts = TaskCounts::tally(&tasks);
        assert_eq!(counts.total, 5);
        assert_eq!(counts.open(), 3);
        assert_eq!(counts.completed, 1);
        assert_eq!(counts.cancelled, 1);
    }

    #[test]
    fn status_parse_rejects_unknown() {
        assert_eq!(
            TaskStatus::from_str("IN_PROGRESS").unwrap(),
            TaskStatus::InProgress
        );
        let err = TaskStatus::from_str("in-progress").unwrap_err();
        assert!(err.to_string().contains("Valid statuses"));
    }

    #[test]
    fn serde_names_match_database_strings() {
        let json = serde_json::to_string(&TaskStatus::InProgress).unwrap();
        assert_eq!(json, format!("\"{STATUS_IN_PROGRESS}\""));
        let json = serde_json::to_string(&TaskPriority::Urgent).unwrap();
        assert_eq!(json, format!("\"{PRIORITY_URGENT}\""));
    }
}
