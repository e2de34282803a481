//! Configuration management for convoylog.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::coords;
use crate::error::{Error, Result};
use crate::location;
use crate::location::gpsd::GpsdProviderConfig;

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Default data directory name.
const DATA_DIR_NAME: &str = "convoylog";

/// Default database file name.
const DATABASE_FILE_NAME: &str = "obstacles.db";

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `CONVOYLOG_`, sections separated
///    by a double underscore, e.g. `CONVOYLOG_LOCATION__TIMEOUT_SECS`)
/// 2. TOML config file at `~/.config/convoylog/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Storage configuration.
    pub storage: StorageConfig,
    /// Location lookup configuration.
    pub location: LocationConfig,
    /// Display configuration.
    pub display: DisplayConfig,
}

/// Storage-related configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Path to the database file.
    /// Defaults to `~/.local/share/convoylog/obstacles.db`
    pub database_path: Option<PathBuf>,
}

/// Location lookup configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationConfig {
    /// Permission gate for location lookups. When `false`, every lookup
    /// fails with a permission error before any device access.
    pub consent: bool,
    /// gpsd endpoint host.
    pub host: String,
    /// gpsd endpoint port.
    pub port: u16,
    /// Upper bound on one lookup, in seconds.
    pub timeout_secs: u64,
    /// Fixes older than this are discarded as stale, in seconds.
    pub max_age_secs: u64,
}

/// Display-related configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Decimal places when formatting coordinates.
    pub coordinate_precision: usize,
}

impl Default for LocationConfig {
    fn default() -> Self {
        Self {
            consent: true,
            host: convoylog_gpsd::DEFAULT_HOST.to_string(),
            port: convoylog_gpsd::DEFAULT_PORT,
            timeout_secs: location::DEFAULT_TIMEOUT.as_secs(),
            max_age_secs: location::DEFAULT_MAX_AGE.as_secs(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            coordinate_precision: coords::DEFAULT_PRECISION,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `CONVOYLOG_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file).nested())
            .merge(Env::prefixed("CONVOYLOG_").split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(DATA_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Get the default data directory path.
    #[must_use]
    pub fn default_data_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join(DATA_DIR_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.location.timeout_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "location.timeout_secs must be greater than 0".to_string(),
            });
        }

        if self.location.max_age_secs == 0 {
            return Err(Error::ConfigValidation {
                message: "location.max_age_secs must be greater than 0".to_string(),
            });
        }

        if self.location.host.trim().is_empty() {
            return Err(Error::ConfigValidation {
                message: "location.host must not be empty".to_string(),
            });
        }

        if self.location.port == 0 {
            return Err(Error::ConfigValidation {
                message: "location.port must not be 0".to_string(),
            });
        }

        if self.display.coordinate_precision > 10 {
            return Err(Error::ConfigValidation {
                message: format!(
                    "display.coordinate_precision ({}) cannot be greater than 10",
                    self.display.coordinate_precision
                ),
            });
        }

        Ok(())
    }

    /// Get the database path, resolving defaults if not set.
    #[must_use]
    pub fn database_path(&self) -> PathBuf {
        self.storage
            .database_path
            .clone()
            .unwrap_or_else(|| Self::default_data_dir().join(DATABASE_FILE_NAME))
    }

    /// Get the lookup timeout as a Duration.
    #[must_use]
    pub fn lookup_timeout(&self) -> Duration {
        Duration::from_secs(self.location.timeout_secs)
    }

    /// Get the fix freshness threshold as a Duration.
    #[must_use]
    pub fn max_fix_age(&self) -> Duration {
        Duration::from_secs(self.location.max_age_secs)
    }

    /// Build the gpsd provider settings from this configuration.
    #[must_use]
    pub fn gpsd_provider_config(&self) -> GpsdProviderConfig {
        GpsdProviderConfig {
            host: self.location.host.clone(),
            port: self.location.port,
            consent: self.location.consent,
            timeout: self.lookup_timeout(),
            max_age: self.max_fix_age(),
        }
    }
}
