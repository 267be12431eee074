#![allow(dead_code)]

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use workforce_core::attendance::Location;
use workforce_core::clock::ManualClock;
use workforce_core::employee::{CreateEmployee, Employee};
use workforce_core::error::CoreError;
use workforce_core::password::{Argon2Verifier, CredentialVerifier};
use workforce_core::roles::Role;
use workforce_core::types::Timestamp;
use workforce_engine::config::EngineConfig;
use workforce_engine::store::MemoryStore;
use workforce_engine::Workforce;

/// Password given to every employee created through [`hire`].
pub const PASSWORD: &str = "employee123";

/// Reversible stand-in for Argon2 so that tests which do not exercise
/// authentication stay fast.
#[derive(Debug, Default)]
pub struct PlainVerifier;

impl CredentialVerifier for PlainVerifier {
    fn hash(&self, secret: &str) -> Result<String, CoreError> {
        Ok(format!("plain:{secret}"))
    }

    fn verify(&self, secret: &str, stored_hash: &str) -> Result<bool, CoreError> {
        Ok(stored_hash.strip_prefix("plain:") == Some(secret))
    }
}

pub struct Harness {
    pub workforce: Workforce,
    pub clock: Arc<ManualClock>,
    pub store: Arc<MemoryStore>,
}

/// 2026-03-02 at the given UTC time.
pub fn at(hour: u32, minute: u32, second: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 2, hour, minute, second).unwrap()
}

pub fn hq() -> Location {
    Location::new(40.0, -74.0)
}

fn build(verifier: Arc<dyn CredentialVerifier>) -> Harness {
    let clock = Arc::new(ManualClock::new(at(8, 0, 0)));
    let store = Arc::new(MemoryStore::new());
    let workforce = Workforce::new(store.clone(), clock.clone(), verifier, EngineConfig::utc());
    Harness {
        workforce,
        clock,
        store,
    }
}

/// Engine over an empty in-memory store, with the clock at 08:00 UTC and
/// the stats day in UTC.
pub fn harness() -> Harness {
    build(Arc::new(PlainVerifier))
}

/// Same as [`harness`] but with real Argon2 credential hashing.
pub fn harness_with_argon2() -> Harness {
    build(Arc::new(Argon2Verifier))
}

pub fn profile(email: &str, role: Role) -> CreateEmployee {
    CreateEmployee {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "Test".to_string(),
        last_name: "Employee".to_string(),
        role,
        department: "Engineering".to_string(),
        position: "Developer".to_string(),
        avatar: None,
    }
}

pub async fn hire(harness: &Harness, email: &str, role: Role) -> Employee {
    harness
        .workforce
        .directory()
        .create(profile(email, role))
        .await
        .expect("employee creation should succeed")
}
