//! Login session tracking.
//!
//! Starting a session never checks for an existing one, so an employee can
//! hold several active sessions at once. Ending closes all of them.

use std::sync::Arc;

use workforce_core::attendance::Location;
use workforce_core::clock::Clock;
use workforce_core::session::{LoginSession, NewLoginSession, UNKNOWN_CLIENT};
use workforce_core::types::DbId;

use crate::error::EngineResult;
use crate::store::SessionStore;

pub struct SessionTracker {
    store: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
}

fn or_unknown(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        UNKNOWN_CLIENT.to_string()
    } else {
        trimmed.to_string()
    }
}

impl SessionTracker {
    pub fn new(store: Arc<dyn SessionStore>, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Record a login. Blank origin or client identifier is stored as
    /// `"Unknown"`.
    pub async fn start(
        &self,
        employee_id: DbId,
        origin: &str,
        client_id: &str,
        location: Option<Location>,
    ) -> EngineResult<LoginSession> {
        let input = NewLoginSession {
            employee_id,
            login_time: self.clock.now(),
            ip_address: or_unknown(origin),
            user_agent: or_unknown(client_id),
            location,
        };
        let session = self.store.insert_session(&input).await?;
        tracing::info!(
            employee_id,
            session_id = session.id,
            origin = %session.ip_address,
            "Session started"
        );
        Ok(session)
    }

    /// Close every active session of the employee. Zero is not an error.
    pub async fn end_all(&self, employee_id: DbId) -> EngineResult<u64> {
        let closed = self.store.end_sessions(employee_id, self.clock.now()).await?;
        tracing::info!(employee_id, closed, "Sessions ended");
        Ok(closed)
    }

    /// Newest login first.
    pub async fn list_all(&self) -> EngineResult<Vec<LoginSession>> {
        Ok(self.store.sessions().await?)
    }

    /// Distinct employees with at least one active session.
    pub async fn currently_online(&self) -> EngineResult<Vec<DbId>> {
        let ids = self.store.online_employee_ids().await?;
        tracing::debug!(count = ids.len(), "Resolved online employees");
        Ok(ids)
    }
}
