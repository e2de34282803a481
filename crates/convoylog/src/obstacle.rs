//! Core record types for convoylog.
//!
//! This module defines the obstacle record as it is persisted: a title, a
//! free-form description, an optional coordinate pair, and bookkeeping
//! fields assigned by the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, positive north.
    pub latitude: f64,

    /// Longitude in degrees, positive east.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components fall inside the valid geographic ranges
    /// (latitude -90..=90, longitude -180..=180).
    #[must_use]
    pub fn in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A recorded road obstacle.
///
/// Serializes to the camelCase JSON shape used by the persisted collection,
/// with `coordinates` written as an explicit `null` when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    /// Unique identifier (assigned by the store; epoch milliseconds as text).
    pub id: String,

    /// Short label, e.g. "Travaux sur la route".
    pub title: String,

    /// Free-form description: estimated duration, possible detours, and so on.
    pub description: String,

    /// Where the obstacle is, when the reporter attached a position.
    pub coordinates: Option<Coordinates>,

    /// When this record was created (assigned by the store).
    pub created_at: DateTime<Utc>,
}

impl Obstacle {
    /// Whether a position is attached to this record.
    #[must_use]
    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }
}

/// Caller-supplied fields for a record that has not been stored yet.
///
/// Identifier and creation timestamp are assigned when the store accepts it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewObstacle {
    /// Short label for the obstacle.
    pub title: String,

    /// Free-form description.
    pub description: String,

    /// Optional position.
    pub coordinates: Option<Coordinates>,
}

impl NewObstacle {
    /// Create a new obstacle input with no coordinates.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            coordinates: None,
        }
    }

    /// Attach a coordinate pair.
    #[must_use]
    pub fn with_coordinates(mut self, coordinates: Coordinates) -> Self {
        self.coordinates = Some(coordinates);
        self
    }
}
