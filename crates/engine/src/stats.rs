//! Dashboard snapshots, recomputed on every call.

use std::sync::Arc;

use chrono::FixedOffset;
use workforce_core::attendance::day_window;
use workforce_core::clock::Clock;
use workforce_core::error::CoreError;
use workforce_core::stats::{
    average_hours, completed_hours_in_window, DashboardStats, EmployeeSnapshot,
};
use workforce_core::types::DbId;

use crate::error::EngineResult;
use crate::store::{EmployeeStore, SessionStore, TaskStore, TimeEntryStore};

pub struct StatsAggregator {
    employees: Arc<dyn EmployeeStore>,
    entries: Arc<dyn TimeEntryStore>,
    sessions: Arc<dyn SessionStore>,
    tasks: Arc<dyn TaskStore>,
    clock: Arc<dyn Clock>,
    /// Offset whose local midnight starts "today".
    day_offset: FixedOffset,
}

impl StatsAggregator {
    pub fn new(
        employees: Arc<dyn EmployeeStore>,
        entries: Arc<dyn TimeEntryStore>,
        sessions: Arc<dyn SessionStore>,
        tasks: Arc<dyn TaskStore>,
        clock: Arc<dyn Clock>,
        day_offset: FixedOffset,
    ) -> Self {
        Self {
            employees,
            entries,
            sessions,
            tasks,
            clock,
            day_offset,
        }
    }

    pub async fn per_employee_snapshot(
        &self,
        employee_id: DbId,
    ) -> EngineResult<EmployeeSnapshot> {
        if self.employees.employee_by_id(employee_id).await?.is_none() {
            return Err(CoreError::NotFound {
                entity: "Employee",
                id: employee_id,
            }
            .into());
        }

        let (start, end) = day_window(self.clock.now(), self.day_offset);
        let today = self
            .entries
            .time_entries_clocked_in_between(start, end, Some(employee_id))
            .await?;
        let counts = self.tasks.task_counts(Some(employee_id)).await?;
        let active = self.entries.active_time_entry(employee_id).await?;

        let snapshot = EmployeeSnapshot {
            today_hours: completed_hours_in_window(&today, start, end),
            active_task_count: counts.open(),
            completed_task_count: counts.completed,
            total_task_count: counts.total,
            is_currently_clocked: active.is_some(),
        };
        tracing::debug!(employee_id, ?snapshot, "Computed employee snapshot");
        Ok(snapshot)
    }

    pub async fn company_snapshot(&self) -> EngineResult<DashboardStats> {
        let (start, end) = day_window(self.clock.now(), self.day_offset);

        let total_employees = self.employees.count_active_employees().await?;
        let active_employees = self.sessions.online_employee_ids().await?.len() as i64;
        let counts = self.tasks.task_counts(None).await?;
        let today = self
            .entries
            .time_entries_clocked_in_between(start, end, None)
            .await?;
        let total_hours_today = completed_hours_in_window(&today, start, end);

        let stats = DashboardStats {
            total_employees,
            active_employees,
            total_tasks: counts.total,
            completed_tasks: counts.completed,
            pending_tasks: counts.pending,
            total_hours_today,
            average_hours_per_employee: average_hours(total_hours_today, active_employees),
        };
        tracing::debug!(?stats, "Computed company snapshot");
        Ok(stats)
    }
}
