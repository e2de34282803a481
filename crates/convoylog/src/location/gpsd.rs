//! gpsd-backed location provider.
//!
//! Adapts the `convoylog-gpsd` client to the [`LocationProvider`] trait and
//! maps its errors onto [`LocationError`] kinds.

use std::time::Duration;

use async_trait::async_trait;
use convoylog_gpsd::{GpsdClient, GpsdError};
use tracing::debug;

use crate::location::{LocationError, LocationFix, LocationProvider, Result};

/// Settings for the gpsd-backed provider.
#[derive(Debug, Clone)]
pub struct GpsdProviderConfig {
    /// gpsd endpoint host.
    pub host: String,

    /// gpsd endpoint port.
    pub port: u16,

    /// Permission gate; `false` refuses every lookup up front.
    pub consent: bool,

    /// Upper bound on one lookup.
    pub timeout: Duration,

    /// Freshness threshold for accepted fixes.
    pub max_age: Duration,
}

impl Default for GpsdProviderConfig {
    fn default() -> Self {
        Self {
            host: convoylog_gpsd::DEFAULT_HOST.to_string(),
            port: convoylog_gpsd::DEFAULT_PORT,
            consent: true,
            timeout: super::DEFAULT_TIMEOUT,
            max_age: super::DEFAULT_MAX_AGE,
        }
    }
}

/// [`LocationProvider`] backed by a local gpsd daemon.
#[derive(Debug)]
pub struct GpsdProvider {
    config: GpsdProviderConfig,
}

impl GpsdProvider {
    /// Create a provider with the given settings.
    #[must_use]
    pub fn new(config: GpsdProviderConfig) -> Self {
        Self { config }
    }

    fn client(&self) -> GpsdClient {
        GpsdClient::new(self.config.host.as_str(), self.config.port)
            .with_max_age(self.config.max_age)
    }
}

#[async_trait]
impl LocationProvider for GpsdProvider {
    fn name(&self) -> &'static str {
        "gpsd"
    }

    async fn request_permission(&self) -> bool {
        self.config.consent
    }

    async fn services_enabled(&self) -> bool {
        match self.client().probe().await {
            Ok(()) => true,
            Err(error) => {
                debug!("gpsd probe failed: {error}");
                false
            }
        }
    }

    async fn current_fix(&self) -> Result<LocationFix> {
        if !self.request_permission().await {
            return Err(LocationError::PermissionDenied);
        }
        let fix = self
            .client()
            .watch_fix(self.config.timeout)
            .await
            .map_err(map_gpsd_error)?;
        debug!(
            "Got fix {:.6},{:.6} (accuracy {:.1} m)",
            fix.latitude, fix.longitude, fix.accuracy
        );
        Ok(LocationFix {
            latitude: fix.latitude,
            longitude: fix.longitude,
            accuracy: fix.accuracy,
        })
    }
}

/// Map a client failure onto the provider error kinds.
fn map_gpsd_error(error: GpsdError) -> LocationError {
    match error {
        GpsdError::Connect { .. } => LocationError::ServicesDisabled,
        GpsdError::Timeout(_) => LocationError::Timeout,
        GpsdError::NoFix | GpsdError::Protocol { .. } => {
            LocationError::Unavailable(error.to_string())
        }
        GpsdError::Io(_) => LocationError::Unknown(error.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncWriteExt;
    use tokio::net::TcpListener;

    fn provider_for(addr: std::net::SocketAddr, consent: bool) -> GpsdProvider {
        GpsdProvider::new(GpsdProviderConfig {
            host: addr.ip().to_string(),
            port: addr.port(),
            consent,
            timeout: Duration::from_secs(5),
            max_age: Duration::from_secs(10),
        })
    }

    async fn fix_server() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let banner = r#"{"class":"VERSION","release":"3.25","proto_major":3,"proto_minor":15}"#;
            let tpv = format!(
                r#"{{"class":"TPV","mode":3,"time":"{}","lat":48.1173,"lon":-1.6778,"eph":6.0}}"#,
                chrono::Utc::now().to_rfc3339()
            );
            stream
                .write_all(format!("{banner}\n{tpv}\n").as_bytes())
                .await
                .unwrap();
            tokio::time::sleep(Duration::from_secs(30)).await;
        });
        addr
    }

    async fn dead_addr() -> std::net::SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    }

    #[test]
    fn test_default_config() {
        let config = GpsdProviderConfig::default();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 2947);
        assert!(config.consent);
        assert_eq!(config.timeout, Duration::from_secs(15));
        assert_eq!(config.max_age, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_current_fix_from_daemon() {
        let addr = fix_server().await;
        let provider = provider_for(addr, true);

        assert_eq!(provider.name(), "gpsd");
        assert!(provider.request_permission().await);
        let fix = provider.current_fix().await.unwrap();
        assert_eq!(fix.latitude, 48.1173);
        assert_eq!(fix.longitude, -1.6778);
        assert_eq!(fix.accuracy, 6.0);
    }

    #[tokio::test]
    async fn test_refused_consent_blocks_lookup() {
        // Daemon is never contacted; a dead endpoint must not matter.
        let addr = dead_addr().await;
        let provider = provider_for(addr, false);

        assert!(!provider.request_permission().await);
        let error = provider.current_fix().await.unwrap_err();
        assert!(matches!(error, LocationError::PermissionDenied));
    }

    #[tokio::test]
    async fn test_unreachable_daemon_reads_as_disabled() {
        let addr = dead_addr().await;
        let provider = provider_for(addr, true);

        assert!(!provider.services_enabled().await);
        let error = provider.current_fix().await.unwrap_err();
        assert!(matches!(error, LocationError::ServicesDisabled));
    }

    #[tokio::test]
    async fn test_services_enabled_when_daemon_answers() {
        let addr = fix_server().await;
        let provider = provider_for(addr, true);
        assert!(provider.services_enabled().await);
    }

    #[test]
    fn test_error_mapping() {
        let mapped = map_gpsd_error(GpsdError::Timeout(Duration::from_secs(15)));
        assert!(matches!(mapped, LocationError::Timeout));

        let mapped = map_gpsd_error(GpsdError::NoFix);
        assert!(matches!(mapped, LocationError::Unavailable(_)));

        let mapped = map_gpsd_error(GpsdError::Protocol {
            message: "expected value".to_string(),
        });
        assert!(matches!(mapped, LocationError::Unavailable(_)));

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        let mapped = map_gpsd_error(GpsdError::Io(io));
        assert!(matches!(mapped, LocationError::Unknown(_)));
    }
}
