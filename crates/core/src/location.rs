//! Geolocation capture as an injected capability.
//!
//! Positioning hardware or a browser API sits behind [`LocationProvider`].
//! Capture is bounded by a timeout; on timeout the caller proceeds without a
//! location instead of blocking.

use std::time::Duration;

use async_trait::async_trait;

use crate::attendance::Location;

/// Default capture timeout.
pub const DEFAULT_LOCATION_TIMEOUT: Duration = Duration::from_secs(10);

/// A position fix, optionally labelled.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address: Option<String>,
    /// Accuracy radius in meters, when the provider reports one.
    pub accuracy: Option<f64>,
}

impl From<CapturedLocation> for Location {
    fn from(captured: CapturedLocation) -> Self {
        Location {
            latitude: captured.latitude,
            longitude: captured.longitude,
            address: captured.address,
        }
    }
}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Current position, or `None` if it cannot be determined.
    async fn current_location(&self) -> Option<CapturedLocation>;
}

/// How a capture attempt ended.
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    Located(CapturedLocation),
    Unavailable,
    TimedOut,
}

impl CaptureOutcome {
    pub fn into_location(self) -> Option<Location> {
        match self {
            Self::Located(captured) => Some(captured.into()),
            Self::Unavailable | Self::TimedOut => None,
        }
    }
}

/// Ask `provider` for a fix, giving up after `timeout`.
pub async fn capture_location(
    provider: &dyn LocationProvider,
    timeout: Duration,
) -> CaptureOutcome {
    match tokio::time::timeout(timeout, provider.current_location()).await {
        Ok(Some(captured)) => CaptureOutcome::Located(captured),
        Ok(None) => CaptureOutcome::Unavailable,
        Err(_) => CaptureOutcome::TimedOut,
    }
}

/// Provider that always reports the same position. Useful for kiosks with a
/// known fixed location.
#[derive(Debug, Clone)]
pub struct FixedLocationProvider {
    location: Location,
}

impl FixedLocationProvider {
    pub fn new(location: Location) -> Self {
        Self { location }
    }
}

#[async_trait]
impl LocationProvider for FixedLocationProvider {
    async fn current_location(&self) -> Option<CapturedLocation> {
        Some(CapturedLocation {
            latitude: self.location.latitude,
            longitude: self.location.longitude,
            address: self.location.address.clone(),
            accuracy: None,
        })
    }
}
