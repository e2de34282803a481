//! TCP client for a gpsd daemon.
//!
//! One lookup is one session: connect, enable a JSON watch, then read
//! reports until a fresh usable fix arrives or the deadline passes. The
//! client holds only endpoint and freshness settings and is cheap to clone.

use std::time::Duration;

use chrono::Utc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::protocol::{Report, Tpv, WATCH_ENABLE};

/// Default freshness threshold for accepted fixes.
pub const DEFAULT_MAX_AGE: Duration = Duration::from_secs(10);

/// Upper bound on a reachability probe.
const PROBE_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors from talking to gpsd.
#[derive(Debug, Error)]
pub enum GpsdError {
    /// Could not reach the daemon.
    #[error("cannot connect to gpsd at {endpoint}: {source}")]
    Connect {
        /// The `host:port` endpoint that refused us.
        endpoint: String,
        /// The underlying connection error.
        #[source]
        source: std::io::Error,
    },

    /// The stream produced a line that is not a valid report.
    #[error("malformed gpsd report: {message}")]
    Protocol {
        /// What the parser rejected.
        message: String,
    },

    /// The daemon closed the stream before a usable fix arrived.
    #[error("gpsd stream ended without a usable fix")]
    NoFix,

    /// No fresh fix arrived within the allowed time.
    #[error("no usable gpsd fix within {0:?}")]
    Timeout(Duration),

    /// Socket I/O failed mid-session.
    #[error("gpsd I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for gpsd operations.
pub type Result<T> = std::result::Result<T, GpsdError>;

/// A usable fix extracted from the watch stream.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fix {
    /// Latitude in degrees (positive north).
    pub latitude: f64,

    /// Longitude in degrees (positive east).
    pub longitude: f64,

    /// Horizontal accuracy estimate in meters, `0.0` when unreported.
    pub accuracy: f64,
}

/// Client for one gpsd endpoint.
#[derive(Debug, Clone)]
pub struct GpsdClient {
    host: String,
    port: u16,
    max_age: Duration,
}

impl GpsdClient {
    /// Create a client for the given endpoint.
    #[must_use]
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            max_age: DEFAULT_MAX_AGE,
        }
    }

    /// Set the freshness threshold; older fixes are discarded as stale.
    #[must_use]
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        self.max_age = max_age;
        self
    }

    /// The `host:port` endpoint this client talks to.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Check whether the daemon accepts connections.
    ///
    /// # Errors
    ///
    /// Returns [`GpsdError::Connect`] when the endpoint is unreachable or
    /// the probe runs out of time.
    pub async fn probe(&self) -> Result<()> {
        match timeout(PROBE_TIMEOUT, self.connect()).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(error)) => Err(error),
            Err(_) => Err(GpsdError::Connect {
                endpoint: self.endpoint(),
                source: std::io::Error::new(std::io::ErrorKind::TimedOut, "probe timed out"),
            }),
        }
    }

    /// Watch the report stream until a fresh usable fix arrives.
    ///
    /// # Errors
    ///
    /// Returns [`GpsdError::Timeout`] when `deadline` passes first, and the
    /// other [`GpsdError`] kinds for connection, protocol, and stream
    /// failures.
    pub async fn watch_fix(&self, deadline: Duration) -> Result<Fix> {
        match timeout(deadline, self.watch_fix_inner()).await {
            Ok(result) => result,
            Err(_) => Err(GpsdError::Timeout(deadline)),
        }
    }

    async fn watch_fix_inner(&self) -> Result<Fix> {
        let stream = self.connect().await?;
        let (read_half, mut write_half) = stream.into_split();
        write_half.write_all(WATCH_ENABLE.as_bytes()).await?;

        let mut reader = BufReader::new(read_half);
        let mut line = String::new();
        loop {
            line.clear();
            let read = reader.read_line(&mut line).await?;
            if read == 0 {
                return Err(GpsdError::NoFix);
            }
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let report = Report::parse(trimmed).map_err(|error| GpsdError::Protocol {
                message: error.to_string(),
            })?;
            match report {
                Report::Version(version) => {
                    debug!(
                        "Connected to gpsd {}",
                        version.release.as_deref().unwrap_or("(unknown release)")
                    );
                }
                Report::Tpv(tpv) => {
                    if let Some(fix) = self.usable_fix(&tpv) {
                        return Ok(fix);
                    }
                }
                Report::Other => trace!("Skipping report we do not act on"),
            }
        }
    }

    /// Extract a fix from a `TPV` report, discarding no-fix and stale ones.
    fn usable_fix(&self, tpv: &Tpv) -> Option<Fix> {
        if !tpv.has_fix() {
            debug!("Ignoring TPV without usable fix (mode {})", tpv.mode);
            return None;
        }
        if let Some(age) = tpv.age(Utc::now()) {
            if age > self.max_age {
                debug!("Discarding stale fix ({})s old", age.as_secs());
                return None;
            }
        }
        Some(Fix {
            latitude: tpv.lat?,
            longitude: tpv.lon?,
            accuracy: tpv.horizontal_accuracy(),
        })
    }

    async fn connect(&self) -> Result<TcpStream> {
        TcpStream::connect((self.host.as_str(), self.port))
            .await
            .map_err(|source| GpsdError::Connect {
                endpoint: self.endpoint(),
                source,
            })
    }
}
