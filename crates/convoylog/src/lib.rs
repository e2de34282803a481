//! `convoylog` - An on-device road obstacle log for oversize-load convoys
//!
//! This library provides the core functionality for recording road obstacles
//! with optional coordinates, persisting them locally, and looking up the
//! emergency contact directory for the route.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod contacts;
pub mod coords;
pub mod error;
pub mod location;
pub mod logging;
pub mod notify;
pub mod obstacle;
pub mod store;

pub use config::Config;
pub use contacts::{emergency_contacts, Contact, ContactKind};
pub use coords::{classify_location_error, format_coordinates, validate_coordinates};
pub use error::{Error, Result};
pub use location::{LocationError, LocationFix, LocationProvider};
pub use logging::init_logging;
pub use notify::{Notification, NotificationSink, Severity};
pub use obstacle::{Coordinates, NewObstacle, Obstacle};
pub use store::{ObstacleStore, StoreStats};
