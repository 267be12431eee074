//! Facade wiring the components to one store, plus the login and logout
//! use cases that span several of them.

use std::fmt;
use std::sync::Arc;

use workforce_core::attendance::{Location, TimeEntry, AUTO_CLOCK_IN_NOTE};
use workforce_core::clock::Clock;
use workforce_core::employee::{CreateEmployee, Employee};
use workforce_core::error::CoreError;
use workforce_core::location::{capture_location, CaptureOutcome, LocationProvider};
use workforce_core::password::CredentialVerifier;
use workforce_core::roles::Role;
use workforce_core::session::LoginSession;
use workforce_core::stats::{DashboardStats, EmployeeSnapshot};
use workforce_core::task::{CreateTask, Task, TaskStatus};
use workforce_core::types::DbId;

use crate::config::{AdminSeed, EngineConfig};
use crate::directory::EmployeeDirectory;
use crate::error::{EngineError, EngineResult};
use crate::ledger::TimeEntryLedger;
use crate::sessions::SessionTracker;
use crate::stats::StatsAggregator;
use crate::store::Store;
use crate::tasks::TaskBoard;

/// A login attempt as received from the request layer.
#[derive(Clone)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Network origin, e.g. the client IP.
    pub origin: String,
    /// Client identifier, e.g. the user agent.
    pub client_id: String,
    /// When present, the employee is clocked in at this position.
    pub location: Option<Location>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("origin", &self.origin)
            .field("client_id", &self.client_id)
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub employee: Employee,
    pub session: LoginSession,
    /// The active entry after login: newly opened, or the one already open.
    /// `None` when no location was supplied.
    pub time_entry: Option<TimeEntry>,
}

#[derive(Debug, Clone)]
pub struct LogoutOutcome {
    /// The entry closed by this logout, if the employee was clocked in.
    pub time_entry: Option<TimeEntry>,
    pub sessions_closed: u64,
}

pub struct Workforce {
    directory: EmployeeDirectory,
    ledger: TimeEntryLedger,
    sessions: SessionTracker,
    tasks: TaskBoard,
    stats: StatsAggregator,
    config: EngineConfig,
}

impl Workforce {
    pub fn new<S>(
        store: Arc<S>,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn CredentialVerifier>,
        config: EngineConfig,
    ) -> Self
    where
        S: Store + 'static,
    {
        Self {
            directory: EmployeeDirectory::new(
                store.clone(),
                verifier,
                clock.clone(),
                config.min_password_length,
            ),
            ledger: TimeEntryLedger::new(store.clone(), clock.clone()),
            sessions: SessionTracker::new(store.clone(), clock.clone()),
            tasks: TaskBoard::new(store.clone(), store.clone(), clock.clone()),
            stats: StatsAggregator::new(
                store.clone(),
                store.clone(),
                store.clone(),
                store,
                clock,
                config.stats_utc_offset,
            ),
            config,
        }
    }

    pub fn directory(&self) -> &EmployeeDirectory {
        &self.directory
    }

    pub fn ledger(&self) -> &TimeEntryLedger {
        &self.ledger
    }

    pub fn sessions(&self) -> &SessionTracker {
        &self.sessions
    }

    pub fn tasks(&self) -> &TaskBoard {
        &self.tasks
    }

    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Resolve credentials to an employee or a generic rejection.
    pub async fn authenticate(&self, email: &str, secret: &str) -> EngineResult<Employee> {
        match self.directory.verify_credentials(email, secret).await? {
            Some(employee) => Ok(employee),
            None => {
                tracing::warn!(email, "Rejected login attempt");
                Err(CoreError::Rejected.into())
            }
        }
    }

    /// Authenticate, open a session, and clock in when a location is given.
    ///
    /// An employee who is already clocked in keeps the open entry.
    pub async fn login(&self, request: LoginRequest) -> EngineResult<LoginOutcome> {
        let LoginRequest {
            email,
            password,
            origin,
            client_id,
            location,
        } = request;
        let employee = self.authenticate(&email, &password).await?;
        // A rejected location must not leave a session behind.
        location.as_ref().map(Location::validate).transpose()?;

        let session = self
            .sessions
            .start(employee.id, &origin, &client_id, location.clone())
            .await?;

        let time_entry = match location {
            Some(location) => Some(self.clock_in_on_login(employee.id, location).await?),
            None => None,
        };

        Ok(LoginOutcome {
            employee,
            session,
            time_entry,
        })
    }

    async fn clock_in_on_login(
        &self,
        employee_id: DbId,
        location: Location,
    ) -> EngineResult<TimeEntry> {
        let result = self
            .ledger
            .clock_in(
                employee_id,
                location.or_fallback_address(),
                Some(AUTO_CLOCK_IN_NOTE.to_string()),
            )
            .await;
        match result {
            Err(EngineError::Core(CoreError::AlreadyActive { .. })) => {
                tracing::debug!(employee_id, "Already clocked in at login; keeping open entry");
                self.ledger
                    .get_active(employee_id)
                    .await?
                    .ok_or_else(|| CoreError::NoActiveEntry { employee_id }.into())
            }
            other => other,
        }
    }

    /// Clock out if clocked in, then close every active session.
    /// Repeating a logout is harmless.
    pub async fn logout(&self, employee_id: DbId) -> EngineResult<LogoutOutcome> {
        let time_entry = match self.ledger.clock_out(employee_id).await {
            Ok(entry) => Some(entry),
            Err(EngineError::Core(CoreError::NoActiveEntry { .. })) => {
                tracing::debug!(employee_id, "Not clocked in at logout");
                None
            }
            Err(e) => return Err(e),
        };
        let sessions_closed = self.sessions.end_all(employee_id).await?;
        Ok(LogoutOutcome {
            time_entry,
            sessions_closed,
        })
    }

    // -----------------------------------------------------------------------
    // Attendance
    // -----------------------------------------------------------------------

    /// Clock in at the given coordinates. Without an address, the label
    /// becomes the coordinates at four decimals.
    pub async fn clock_in(
        &self,
        employee_id: DbId,
        latitude: f64,
        longitude: f64,
        address: Option<String>,
    ) -> EngineResult<TimeEntry> {
        let location = Location {
            latitude,
            longitude,
            address,
        }
        .or_fallback_address();
        self.ledger.clock_in(employee_id, location, None).await
    }

    pub async fn clock_out(&self, employee_id: DbId) -> EngineResult<TimeEntry> {
        self.ledger.clock_out(employee_id).await
    }

    /// Ask `provider` for a fix within the configured timeout.
    pub async fn capture_location(&self, provider: &dyn LocationProvider) -> Option<Location> {
        let outcome = capture_location(provider, self.config.location_timeout).await;
        match &outcome {
            CaptureOutcome::TimedOut => tracing::warn!(
                timeout_secs = self.config.location_timeout.as_secs(),
                "Location capture timed out; continuing without location"
            ),
            CaptureOutcome::Unavailable => tracing::debug!("No location available"),
            CaptureOutcome::Located(_) => {}
        }
        outcome.into_location()
    }

    // -----------------------------------------------------------------------
    // Tasks and stats
    // -----------------------------------------------------------------------

    pub async fn create_task(&self, input: CreateTask) -> EngineResult<Task> {
        self.tasks.create(input).await
    }

    pub async fn update_task_status(
        &self,
        task_id: DbId,
        status: TaskStatus,
    ) -> EngineResult<Task> {
        self.tasks.update_status(task_id, status).await
    }

    pub async fn per_employee_snapshot(
        &self,
        employee_id: DbId,
    ) -> EngineResult<EmployeeSnapshot> {
        self.stats.per_employee_snapshot(employee_id).await
    }

    pub async fn company_snapshot(&self) -> EngineResult<DashboardStats> {
        self.stats.company_snapshot().await
    }

    // -----------------------------------------------------------------------
    // Bootstrap
    // -----------------------------------------------------------------------

    /// Create the seed administrator unless the email is already registered.
    pub async fn ensure_admin(&self, seed: &AdminSeed) -> EngineResult<Employee> {
        if let Some(existing) = self.directory.find_by_email(&seed.email).await? {
            tracing::info!(
                employee_id = existing.id,
                email = %existing.email,
                "Admin already present"
            );
            return Ok(existing);
        }
        let admin = self
            .directory
            .create(CreateEmployee {
                email: seed.email.clone(),
                password: seed.password.clone(),
                first_name: seed.first_name.clone(),
                last_name: seed.last_name.clone(),
                role: Role::Admin,
                department: seed.department.clone(),
                position: seed.position.clone(),
                avatar: None,
            })
            .await?;
        tracing::info!(employee_id = admin.id, email = %admin.email, "Admin seeded");
        Ok(admin)
    }
}
