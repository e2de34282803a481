//! Platform-agnostic location lookup abstraction.
//!
//! This module defines the trait and types a location capability must
//! fulfill: a one-shot permission check, a services check, and a single
//! fresh coordinate fix per call.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::obstacle::Coordinates;

pub mod gpsd;

/// Default upper bound on one lookup.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Default freshness threshold; older fixes are discarded as stale.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10);

/// Errors that can occur during a location lookup.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The user or configuration refused location access.
    #[error("location permission denied")]
    PermissionDenied,

    /// Location services are disabled or unreachable on this device.
    #[error("location services disabled")]
    ServicesDisabled,

    /// No fresh fix arrived within the lookup timeout.
    #[error("location lookup timed out")]
    Timeout,

    /// The capability answered but produced no usable fix.
    #[error("location unavailable: {0}")]
    Unavailable(String),

    /// Any other failure.
    #[error("location error: {0}")]
    Unknown(String),
}

/// Result type for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;

/// A single coordinate snapshot from the device capability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LocationFix {
    /// Latitude in degrees, positive north.
    pub latitude: f64,

    /// Longitude in degrees, positive east.
    pub longitude: f64,

    /// Horizontal accuracy estimate in meters, `0.0` when unreported.
    pub accuracy: f64,
}

impl LocationFix {
    /// The coordinate pair of this fix.
    #[must_use]
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

/// A device capability that can produce one-shot coordinate fixes.
///
/// One call is one snapshot; callers cancel by dropping the future. Nothing
/// here stops two lookups from being in flight at once, so a presentation
/// layer that wants at most one pending lookup enforces that itself.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// The name of this provider (for logging/debugging).
    fn name(&self) -> &'static str;

    /// Ask for permission to read the device location.
    ///
    /// Returns `false` when access is refused. Never fails.
    async fn request_permission(&self) -> bool;

    /// Whether the device's location services are enabled and reachable.
    ///
    /// Never fails; any internal error reads as `false`.
    async fn services_enabled(&self) -> bool;

    /// Obtain a fresh coordinate fix.
    ///
    /// Implementations check permission first and never hand out fixes
    /// older than their freshness threshold.
    ///
    /// # Errors
    ///
    /// Returns [`LocationError::PermissionDenied`] without touching the
    /// device when permission is refused, [`LocationError::Timeout`] when
    /// no fresh fix arrives in time, and the other [`LocationError`] kinds
    /// as the capability classifies its failures.
    async fn current_fix(&self) -> Result<LocationFix>;
}
