//! gpsd client for convoylog.
//!
//! This crate speaks the gpsd JSON protocol over TCP: connect to a running
//! daemon, enable a watch, and read time-position-velocity reports until a
//! fresh usable fix arrives. It knows nothing about obstacle records; the
//! core crate adapts it behind its location provider trait.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod client;
pub mod protocol;

pub use client::{Fix, GpsdClient, GpsdError, DEFAULT_MAX_AGE};
pub use protocol::{Report, Tpv, Version, DEFAULT_HOST, DEFAULT_PORT, WATCH_ENABLE};
