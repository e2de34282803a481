//! Wire types for the gpsd JSON protocol.
//!
//! gpsd speaks newline-delimited JSON objects, each carrying a `class` tag.
//! Only the classes this crate acts on are modeled; everything else parses
//! into [`Report::Other`] and is skipped.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Default gpsd TCP port.
pub const DEFAULT_PORT: u16 = 2947;

/// Default gpsd host for a locally running daemon.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Command that switches a session into JSON watcher mode.
///
/// gpsd streams no reports until a client enables a watch.
pub const WATCH_ENABLE: &str = "?WATCH={\"enable\":true,\"json\":true};\n";

/// `TPV` fix mode: no mode seen yet.
pub const MODE_UNKNOWN: u8 = 0;

/// `TPV` fix mode: receiver has no fix.
pub const MODE_NO_FIX: u8 = 1;

/// `TPV` fix mode: two-dimensional fix.
pub const MODE_2D: u8 = 2;

/// `TPV` fix mode: three-dimensional fix.
pub const MODE_3D: u8 = 3;

/// One report object from the gpsd stream, discriminated by `class`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "class")]
pub enum Report {
    /// Handshake banner sent once on connect.
    #[serde(rename = "VERSION")]
    Version(Version),

    /// Time-position-velocity report.
    #[serde(rename = "TPV")]
    Tpv(Tpv),

    /// Any class this crate does not act on (`WATCH`, `SKY`, `DEVICES`, ...).
    #[serde(other)]
    Other,
}

impl Report {
    /// Parse one newline-delimited report.
    ///
    /// # Errors
    ///
    /// Returns the underlying JSON error when the line is not a well-formed
    /// report object.
    pub fn parse(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line.trim())
    }
}

/// The `VERSION` banner gpsd emits when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Version {
    /// Public release level.
    #[serde(default)]
    pub release: Option<String>,

    /// Internal revision level.
    #[serde(default)]
    pub rev: Option<String>,

    /// Protocol major version.
    #[serde(default)]
    pub proto_major: Option<u32>,

    /// Protocol minor version.
    #[serde(default)]
    pub proto_minor: Option<u32>,
}

/// A `TPV` (time-position-velocity) report.
///
/// Every field is optional on the wire; receivers report what they have.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Tpv {
    /// Fix mode, one of the `MODE_*` constants.
    #[serde(default)]
    pub mode: u8,

    /// Fix timestamp, when the receiver reports one.
    #[serde(default)]
    pub time: Option<DateTime<Utc>>,

    /// Latitude in degrees (positive north).
    #[serde(default)]
    pub lat: Option<f64>,

    /// Longitude in degrees (positive east).
    #[serde(default)]
    pub lon: Option<f64>,

    /// Estimated horizontal position error, meters.
    #[serde(default)]
    pub eph: Option<f64>,

    /// Longitude error estimate, meters.
    #[serde(default)]
    pub epx: Option<f64>,

    /// Latitude error estimate, meters.
    #[serde(default)]
    pub epy: Option<f64>,
}

impl Tpv {
    /// Whether this report carries a usable position.
    #[must_use]
    pub fn has_fix(&self) -> bool {
        self.mode >= MODE_2D && self.lat.is_some() && self.lon.is_some()
    }

    /// Horizontal accuracy estimate in meters.
    ///
    /// Prefers the combined `eph` value, falls back to the worse of the
    /// per-axis estimates, and reports `0.0` when the receiver gives none.
    #[must_use]
    pub fn horizontal_accuracy(&self) -> f64 {
        if let Some(eph) = self.eph {
            return eph;
        }
        match (self.epx, self.epy) {
            (Some(x), Some(y)) => x.max(y),
            (Some(v), None) | (None, Some(v)) => v,
            (None, None) => 0.0,
        }
    }

    /// Age of the fix relative to `now`.
    ///
    /// `None` when the report has no timestamp, or when the timestamp lies
    /// in the future (receiver clock ahead of ours counts as fresh).
    #[must_use]
    pub fn age(&self, now: DateTime<Utc>) -> Option<std::time::Duration> {
        let time = self.time?;
        now.signed_duration_since(time).to_std().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_version_banner() {
        let line = r#"{"class":"VERSION","release":"3.25","rev":"3.25","proto_major":3,"proto_minor":15}"#;
        let report = Report::parse(line).unwrap();
        match report {
            Report::Version(v) => {
                assert_eq!(v.release.as_deref(), Some("3.25"));
                assert_eq!(v.proto_major, Some(3));
            }
            other => panic!("expected VERSION, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_full_tpv() {
        let line = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":3,"time":"2024-01-15T10:30:00.000Z","lat":48.1173,"lon":-1.6778,"alt":42.0,"epx":8.5,"epy":12.0,"epv":30.1,"speed":0.2}"#;
        let report = Report::parse(line).unwrap();
        match report {
            Report::Tpv(tpv) => {
                assert_eq!(tpv.mode, MODE_3D);
                assert_eq!(tpv.lat, Some(48.1173));
                assert_eq!(tpv.lon, Some(-1.6778));
                assert!(tpv.has_fix());
            }
            other => panic!("expected TPV, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tpv_without_fix() {
        let line = r#"{"class":"TPV","device":"/dev/ttyUSB0","mode":1}"#;
        let report = Report::parse(line).unwrap();
        match report {
            Report::Tpv(tpv) => {
                assert_eq!(tpv.mode, MODE_NO_FIX);
                assert!(!tpv.has_fix());
            }
            other => panic!("expected TPV, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_unknown_class_is_other() {
        let sky = r#"{"class":"SKY","device":"/dev/ttyUSB0","satellites":[]}"#;
        assert_eq!(Report::parse(sky).unwrap(), Report::Other);

        let watch = r#"{"class":"WATCH","enable":true,"json":true}"#;
        assert_eq!(Report::parse(watch).unwrap(), Report::Other);
    }

    #[test]
    fn test_parse_rejects_junk() {
        assert!(Report::parse("not json at all").is_err());
        assert!(Report::parse(r#"{"no_class_tag":true}"#).is_err());
    }

    #[test]
    fn test_mode_without_coordinates_is_not_a_fix() {
        let tpv = Tpv {
            mode: MODE_2D,
            time: None,
            lat: None,
            lon: None,
            eph: None,
            epx: None,
            epy: None,
        };
        assert!(!tpv.has_fix());
    }

    #[test]
    fn test_accuracy_prefers_eph() {
        let tpv = Tpv {
            mode: MODE_3D,
            time: None,
            lat: Some(1.0),
            lon: Some(2.0),
            eph: Some(5.0),
            epx: Some(20.0),
            epy: Some(30.0),
        };
        assert_eq!(tpv.horizontal_accuracy(), 5.0);
    }

    #[test]
    fn test_accuracy_falls_back_to_worst_axis() {
        let tpv = Tpv {
            mode: MODE_3D,
            time: None,
            lat: Some(1.0),
            lon: Some(2.0),
            eph: None,
            epx: Some(8.5),
            epy: Some(12.0),
        };
        assert_eq!(tpv.horizontal_accuracy(), 12.0);
    }

    #[test]
    fn test_accuracy_defaults_to_zero() {
        let tpv = Tpv {
            mode: MODE_2D,
            time: None,
            lat: Some(1.0),
            lon: Some(2.0),
            eph: None,
            epx: None,
            epy: None,
        };
        assert_eq!(tpv.horizontal_accuracy(), 0.0);
    }

    #[test]
    fn test_age_of_past_fix() {
        let fix_time = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 42).unwrap();
        let tpv = Tpv {
            mode: MODE_3D,
            time: Some(fix_time),
            lat: Some(1.0),
            lon: Some(2.0),
            eph: None,
            epx: None,
            epy: None,
        };
        assert_eq!(tpv.age(now), Some(std::time::Duration::from_secs(42)));
    }

    #[test]
    fn test_age_of_future_fix_is_none() {
        let fix_time = Utc.with_ymd_and_hms(2024, 1, 15, 10, 31, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        let tpv = Tpv {
            mode: MODE_3D,
            time: Some(fix_time),
            lat: Some(1.0),
            lon: Some(2.0),
            eph: None,
            epx: None,
            epy: None,
        };
        assert_eq!(tpv.age(now), None);
    }

    #[test]
    fn test_age_without_timestamp_is_none() {
        let tpv = Tpv {
            mode: MODE_2D,
            time: None,
            lat: Some(1.0),
            lon: Some(2.0),
            eph: None,
            epx: None,
            epy: None,
        };
        assert_eq!(tpv.age(Utc::now()), None);
    }

    #[test]
    fn test_fractional_second_timestamps_parse() {
        let line = r#"{"class":"TPV","mode":3,"time":"2010-04-30T11:48:20.10Z","lat":46.498204497,"lon":7.568061439}"#;
        let report = Report::parse(line).unwrap();
        match report {
            Report::Tpv(tpv) => assert!(tpv.time.is_some()),
            other => panic!("expected TPV, got {other:?}"),
        }
    }
}
