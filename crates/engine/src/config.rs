//! Configuration loaded from environment variables.
//!
//! Every loader has a `from_lookup` twin that reads through a closure, so
//! parsing can be tested without touching the process environment.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{FixedOffset, Local, Offset, Utc};
use workforce_core::location::DEFAULT_LOCATION_TIMEOUT;

const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{var} is invalid: {reason}")]
    Invalid { var: &'static str, reason: String },
}

/// Parse `var` with `T::from_str`, falling back to `default` when unset.
fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}

fn env_lookup(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

// ---------------------------------------------------------------------------
// Database
// ---------------------------------------------------------------------------

/// Connection settings for the PostgreSQL store.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    /// Pool size (default: `20`).
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// | Env Var              | Default    |
    /// |----------------------|------------|
    /// | `DATABASE_URL`       | (required) |
    /// | `DB_MAX_CONNECTIONS` | `20`       |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let url = lookup("DATABASE_URL")
            .filter(|u| !u.trim().is_empty())
            .ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;
        if max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS",
                reason: "must be at least 1".into(),
            });
        }
        Ok(Self {
            url,
            max_connections,
        })
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Behavioural settings shared by the engine components.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Offset defining the local day used by statistics.
    pub stats_utc_offset: FixedOffset,
    /// How long to wait for a location fix before proceeding without one.
    pub location_timeout: Duration,
    /// Minimum secret length for new and changed credentials.
    pub min_password_length: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            stats_utc_offset: Local::now().offset().fix(),
            location_timeout: DEFAULT_LOCATION_TIMEOUT,
            min_password_length: DEFAULT_MIN_PASSWORD_LENGTH,
        }
    }
}

impl EngineConfig {
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `STATS_UTC_OFFSET_MINUTES` | host's local UTC offset |
    /// | `LOCATION_TIMEOUT_SECS`    | `10`                    |
    /// | `MIN_PASSWORD_LENGTH`      | `6`                     |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let stats_utc_offset = match lookup("STATS_UTC_OFFSET_MINUTES") {
            Some(raw) => {
                let minutes: i32 = raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::Invalid {
                        var: "STATS_UTC_OFFSET_MINUTES",
                        reason: e.to_string(),
                    }
                })?;
                minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                    .ok_or_else(|| ConfigError::Invalid {
                        var: "STATS_UTC_OFFSET_MINUTES",
                        reason: format!("{minutes} minutes is outside ±24h"),
                    })?
            }
            None => defaults.stats_utc_offset,
        };

        let timeout_secs = parse_or(
            &lookup,
            "LOCATION_TIMEOUT_SECS",
            defaults.location_timeout.as_secs(),
        )?;
        let min_password_length =
            parse_or(&lookup, "MIN_PASSWORD_LENGTH", defaults.min_password_length)?;

        Ok(Self {
            stats_utc_offset,
            location_timeout: Duration::from_secs(timeout_secs),
            min_password_length,
        })
    }

    /// Settings with the stats day pinned to UTC.
    pub fn utc() -> Self {
        Self {
            stats_utc_offset: Utc.fix(),
            ..Self::default()
        }
    }
}

// ---------------------------------------------------------------------------
// Admin seed
// ---------------------------------------------------------------------------

/// Initial administrator created by `workforce-setup` when absent.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub department: String,
    pub position: String,
}

impl fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminSeed")
            .field("email", &self.email)
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish_non_exhaustive()
    }
}

impl AdminSeed {
    /// Returns `Ok(None)` when `ADMIN_EMAIL` is unset.
    ///
    /// | Env Var            | Default                    |
    /// |--------------------|----------------------------|
    /// | `ADMIN_EMAIL`      | (none)                     |
    /// | `ADMIN_PASSWORD`   | required when email is set |
    /// | `ADMIN_FIRST_NAME` | `System`                   |
    /// | `ADMIN_LAST_NAME`  | `Administrator`            |
    /// | `ADMIN_DEPARTMENT` | `Administration`           |
    /// | `ADMIN_POSITION`   | `Administrator`            |
    pub fn from_env() -> Result<Option<Self>, ConfigError> {
        Self::from_lookup(env_lookup)
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Option<Self>, ConfigError> {
        let Some(email) = lookup("ADMIN_EMAIL").filter(|e| !e.trim().is_empty()) else {
            return Ok(None);
        };
        let password = lookup("ADMIN_PASSWORD")
            .filter(|p| !p.is_empty())
            .ok_or(ConfigError::Missing("ADMIN_PASSWORD"))?;
        let or = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        Ok(Some(Self {
            email: email.trim().to_string(),
            password,
            first_name: or("ADMIN_FIRST_NAME", "System"),
            last_name: or("ADMIN_LAST_NAME", "Administrator"),
            department: or("ADMIN_DEPARTMENT", "Administration"),
            position: or("ADMIN_POSITION", "Administrator"),
        }))
    }
}
