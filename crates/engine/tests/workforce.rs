//! Integration tests for the login and logout flows, location capture and
//! the admin seed.

mod common;

use std::time::Duration as StdDuration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::Duration;
use common::{harness, harness_with_argon2, hire, hq, Harness, PASSWORD};
use workforce_core::attendance::{Location, TimeEntryStatus, AUTO_CLOCK_IN_NOTE};
use workforce_core::error::CoreError;
use workforce_core::location::{CapturedLocation, FixedLocationProvider, LocationProvider};
use workforce_core::roles::Role;
use workforce_engine::config::AdminSeed;
use workforce_engine::workforce::{LoginOutcome, LoginRequest};
use workforce_engine::EngineError;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn login_request(email: &str, location: Option<Location>) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        origin: "192.168.1.20".to_string(),
        client_id: "Mozilla/5.0".to_string(),
        location,
    }
}

async fn login_jane(h: &Harness, location: Option<Location>) -> LoginOutcome {
    h.workforce
        .login(login_request("jane@company.com", location))
        .await
        .expect("login should succeed")
}

struct StalledProvider;

#[async_trait]
impl LocationProvider for StalledProvider {
    async fn current_location(&self) -> Option<CapturedLocation> {
        tokio::time::sleep(StdDuration::from_secs(3600)).await;
        None
    }
}

// ---------------------------------------------------------------------------
// Test: login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_with_location_clocks_in() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let outcome = login_jane(&h, Some(hq())).await;

    assert_eq!(outcome.employee.id, emp.id);
    assert!(outcome.session.is_active);
    assert_eq!(outcome.session.ip_address, "192.168.1.20");

    let entry = outcome.time_entry.expect("login with location clocks in");
    assert_eq!(entry.status, TimeEntryStatus::Active);
    assert_eq!(entry.notes.as_deref(), Some(AUTO_CLOCK_IN_NOTE));
    assert_eq!(entry.address.as_deref(), Some("40.0000, -74.0000"));
}

#[tokio::test]
async fn login_keeps_supplied_address() {
    let h = harness();
    hire(&h, "jane@company.com", Role::Employee).await;

    let outcome = login_jane(&h, Some(hq().with_address("Head office"))).await;
    let entry = outcome.time_entry.unwrap();
    assert_eq!(entry.address.as_deref(), Some("Head office"));
}

#[tokio::test]
async fn login_without_location_only_opens_session() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let outcome = login_jane(&h, None).await;

    assert!(outcome.time_entry.is_none());
    assert!(outcome.session.location.is_none());
    assert!(h.workforce.ledger().get_active(emp.id).await.unwrap().is_none());
}

#[tokio::test]
async fn login_while_clocked_in_keeps_open_entry() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let first = login_jane(&h, Some(hq())).await.time_entry.unwrap();
    h.clock.advance(Duration::hours(2));
    let second = login_jane(&h, Some(hq())).await;

    assert_eq!(second.time_entry.map(|e| e.id), Some(first.id));
    assert_eq!(h.workforce.ledger().list_for(Some(emp.id)).await.unwrap().len(), 1);
    assert_eq!(h.workforce.sessions().currently_online().await.unwrap(), vec![emp.id]);
}

#[tokio::test]
async fn login_with_wrong_password_opens_nothing() {
    let h = harness_with_argon2();
    hire(&h, "jane@company.com", Role::Employee).await;

    let mut request = login_request("jane@company.com", Some(hq()));
    request.password = "not-the-password".into();
    let err = h.workforce.login(request).await.unwrap_err();

    assert_matches!(err, EngineError::Core(CoreError::Rejected));
    assert!(h.workforce.sessions().list_all().await.unwrap().is_empty());
    assert!(h.workforce.ledger().list_for(None).await.unwrap().is_empty());
}

#[tokio::test]
async fn login_with_invalid_location_opens_nothing() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let err = h
        .workforce
        .login(login_request("jane@company.com", Some(Location::new(95.0, 0.0))))
        .await
        .unwrap_err();

    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    assert!(h.workforce.sessions().currently_online().await.unwrap().is_empty());
    assert!(h.workforce.sessions().list_all().await.unwrap().is_empty());
    assert!(h.workforce.ledger().get_active(emp.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: logout
// ---------------------------------------------------------------------------

#[tokio::test]
async fn logout_clocks_out_and_ends_sessions() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;
    login_jane(&h, Some(hq())).await;
    h.clock.advance(Duration::hours(4));

    let outcome = h.workforce.logout(emp.id).await.unwrap();

    let entry = outcome.time_entry.expect("logout closes the open entry");
    assert_eq!(entry.status, TimeEntryStatus::Completed);
    assert_eq!(entry.total_hours, Some(4.0));
    assert_eq!(outcome.sessions_closed, 1);
    assert!(h.workforce.sessions().currently_online().await.unwrap().is_empty());
}

#[tokio::test]
async fn repeated_logout_is_harmless() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;
    login_jane(&h, None).await;

    let first = h.workforce.logout(emp.id).await.unwrap();
    assert!(first.time_entry.is_none());
    assert_eq!(first.sessions_closed, 1);

    let second = h.workforce.logout(emp.id).await.unwrap();
    assert!(second.time_entry.is_none());
    assert_eq!(second.sessions_closed, 0);
}

// ---------------------------------------------------------------------------
// Test: explicit clock-in with fallback address
// ---------------------------------------------------------------------------

#[tokio::test]
async fn clock_in_without_address_uses_coordinates() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let entry = h
        .workforce
        .clock_in(emp.id, 51.507351, -0.127758, None)
        .await
        .unwrap();
    assert_eq!(entry.address.as_deref(), Some("51.5074, -0.1278"));
    assert!(entry.notes.is_none());

    h.clock.advance(Duration::minutes(30));
    let closed = h.workforce.clock_out(emp.id).await.unwrap();
    assert_eq!(closed.total_hours, Some(0.5));
}

// ---------------------------------------------------------------------------
// Test: location capture
// ---------------------------------------------------------------------------

#[tokio::test]
async fn capture_from_fixed_provider() {
    let h = harness();
    let provider = FixedLocationProvider::new(hq().with_address("Kiosk 3"));

    let location = h.workforce.capture_location(&provider).await.unwrap();
    assert_eq!(location.latitude, 40.0);
    assert_eq!(location.address.as_deref(), Some("Kiosk 3"));
}

#[tokio::test(start_paused = true)]
async fn stalled_capture_proceeds_without_location() {
    let h = harness();
    let emp = hire(&h, "jane@company.com", Role::Employee).await;

    let location = h.workforce.capture_location(&StalledProvider).await;
    assert!(location.is_none());

    let outcome = login_jane(&h, location).await;
    assert!(outcome.time_entry.is_none());
    assert!(h.workforce.ledger().get_active(emp.id).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Test: admin seed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ensure_admin_is_idempotent() {
    let h = harness();
    let seed = AdminSeed {
        email: "admin@company.com".into(),
        password: "admin123".into(),
        first_name: "System".into(),
        last_name: "Administrator".into(),
        department: "Administration".into(),
        position: "Administrator".into(),
    };

    let first = h.workforce.ensure_admin(&seed).await.unwrap();
    let second = h.workforce.ensure_admin(&seed).await.unwrap();

    assert_eq!(first.role, Role::Admin);
    assert_eq!(first.id, second.id);
    assert_eq!(h.workforce.directory().count_active().await.unwrap(), 1);
}
