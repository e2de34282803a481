//! Coordinate validation, display formatting, and location error messages.
//!
//! The strings here are the French operator-facing texts shown in the cab;
//! they are part of the product surface and are asserted by tests, so treat
//! them as fixed copy rather than placeholders.

use crate::location::LocationError;

/// Smallest valid latitude, degrees.
pub const MIN_LATITUDE: f64 = -90.0;

/// Largest valid latitude, degrees.
pub const MAX_LATITUDE: f64 = 90.0;

/// Smallest valid longitude, degrees.
pub const MIN_LONGITUDE: f64 = -180.0;

/// Largest valid longitude, degrees.
pub const MAX_LONGITUDE: f64 = 180.0;

/// Decimal places used when formatting coordinates for display.
pub const DEFAULT_PRECISION: usize = 4;

const UNAVAILABLE: &str = "Coordonnées non disponibles";
const INVALID: &str = "Coordonnées invalides";

const MSG_PERMISSION: &str =
    "Permission de localisation refusée. Autorisez l'accès dans les paramètres.";
const MSG_TIMEOUT: &str = "Délai d'attente dépassé. Vérifiez votre signal GPS et réessayez.";
const MSG_DISABLED: &str = "GPS désactivé. Activez la localisation dans les paramètres.";
const MSG_UNAVAILABLE: &str = "Service de localisation indisponible. Vérifiez votre connexion.";
const MSG_GENERIC: &str = "Erreur de géolocalisation. Vérifiez vos paramètres de localisation.";

/// Which coordinate field a validation error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateField {
    /// The latitude input.
    Latitude,
    /// The longitude input.
    Longitude,
}

/// Why a coordinate input failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoordinateFieldError {
    /// The field was missing or blank.
    Required,
    /// The field did not parse as a number.
    NotANumber,
    /// The value fell outside the valid geographic range.
    OutOfRange,
}

impl CoordinateFieldError {
    /// The operator-facing message for this error on the given field.
    #[must_use]
    pub fn message(self, field: CoordinateField) -> &'static str {
        match (field, self) {
            (CoordinateField::Latitude, Self::Required) => "La latitude est requise",
            (CoordinateField::Latitude, Self::NotANumber) => "La latitude doit être un nombre",
            (CoordinateField::Latitude, Self::OutOfRange) => {
                "La latitude doit être comprise entre -90 et 90"
            }
            (CoordinateField::Longitude, Self::Required) => "La longitude est requise",
            (CoordinateField::Longitude, Self::NotANumber) => "La longitude doit être un nombre",
            (CoordinateField::Longitude, Self::OutOfRange) => {
                "La longitude doit être comprise entre -180 et 180"
            }
        }
    }
}

/// Outcome of validating a manually entered coordinate pair.
///
/// Both fields are always checked so a form can show inline errors for each
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordinateValidation {
    /// Latitude error, when that field is invalid.
    pub latitude: Option<CoordinateFieldError>,

    /// Longitude error, when that field is invalid.
    pub longitude: Option<CoordinateFieldError>,
}

impl CoordinateValidation {
    /// Whether both fields passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_none() && self.longitude.is_none()
    }

    /// Operator-facing message for the latitude field, if it failed.
    #[must_use]
    pub fn latitude_message(&self) -> Option<&'static str> {
        self.latitude
            .map(|error| error.message(CoordinateField::Latitude))
    }

    /// Operator-facing message for the longitude field, if it failed.
    #[must_use]
    pub fn longitude_message(&self) -> Option<&'static str> {
        self.longitude
            .map(|error| error.message(CoordinateField::Longitude))
    }

    /// The first error message, latitude before longitude.
    #[must_use]
    pub fn first_message(&self) -> Option<&'static str> {
        self.latitude_message().or_else(|| self.longitude_message())
    }
}

/// Validate a manually entered coordinate pair.
///
/// Inputs are trimmed before parsing. A missing or blank field is required,
/// a non-numeric field (NaN included) is not a number, and a parsed value
/// outside the geographic range is out of range.
#[must_use]
pub fn validate_coordinates(
    latitude: Option<&str>,
    longitude: Option<&str>,
) -> CoordinateValidation {
    CoordinateValidation {
        latitude: validate_field(latitude, MIN_LATITUDE, MAX_LATITUDE),
        longitude: validate_field(longitude, MIN_LONGITUDE, MAX_LONGITUDE),
    }
}

fn validate_field(input: Option<&str>, min: f64, max: f64) -> Option<CoordinateFieldError> {
    let raw = match input {
        Some(raw) => raw.trim(),
        None => return Some(CoordinateFieldError::Required),
    };
    if raw.is_empty() {
        return Some(CoordinateFieldError::Required);
    }
    let value: f64 = match raw.parse() {
        Ok(value) => value,
        Err(_) => return Some(CoordinateFieldError::NotANumber),
    };
    // NaN parses successfully but compares false against every bound.
    if value.is_nan() {
        return Some(CoordinateFieldError::NotANumber);
    }
    if value < min || value > max {
        return Some(CoordinateFieldError::OutOfRange);
    }
    None
}

/// Parse a validated coordinate pair.
///
/// Returns `None` when [`validate_coordinates`] would report any error.
#[must_use]
pub fn parse_coordinates(latitude: &str, longitude: &str) -> Option<crate::obstacle::Coordinates> {
    if !validate_coordinates(Some(latitude), Some(longitude)).is_valid() {
        return None;
    }
    let lat: f64 = latitude.trim().parse().ok()?;
    let lon: f64 = longitude.trim().parse().ok()?;
    Some(crate::obstacle::Coordinates::new(lat, lon))
}

/// Format a coordinate pair for display, with the default precision.
///
/// `46.2044°N, 6.1432°E` style: absolute values with hemisphere letters,
/// `O` (ouest) for west. A missing component yields the fixed "unavailable"
/// message and a non-finite one the fixed "invalid" message.
#[must_use]
pub fn format_coordinates(latitude: Option<f64>, longitude: Option<f64>) -> String {
    format_coordinates_precision(latitude, longitude, DEFAULT_PRECISION)
}

/// Format a coordinate pair for display with an explicit precision.
#[must_use]
pub fn format_coordinates_precision(
    latitude: Option<f64>,
    longitude: Option<f64>,
    precision: usize,
) -> String {
    let (lat, lon) = match (latitude, longitude) {
        (Some(lat), Some(lon)) => (lat, lon),
        _ => return UNAVAILABLE.to_string(),
    };
    if !lat.is_finite() || !lon.is_finite() {
        return INVALID.to_string();
    }
    let ns = if lat >= 0.0 { 'N' } else { 'S' };
    let eo = if lon >= 0.0 { 'E' } else { 'O' };
    format!(
        "{:.prec$}°{ns}, {:.prec$}°{eo}",
        lat.abs(),
        lon.abs(),
        prec = precision
    )
}

/// The operator-facing message for a failed location lookup.
///
/// Typed kinds map directly; [`LocationError::Unknown`] falls back to
/// keyword matching on the message, then to a generic geolocation error.
#[must_use]
pub fn classify_location_error(error: &LocationError) -> &'static str {
    match error {
        LocationError::PermissionDenied => MSG_PERMISSION,
        LocationError::Timeout => MSG_TIMEOUT,
        LocationError::ServicesDisabled => MSG_DISABLED,
        LocationError::Unavailable(_) => MSG_UNAVAILABLE,
        LocationError::Unknown(message) => classify_message(message),
    }
}

fn classify_message(message: &str) -> &'static str {
    let lowered = message.to_lowercase();
    if lowered.contains("permission") {
        MSG_PERMISSION
    } else if lowered.contains("timeout") {
        MSG_TIMEOUT
    } else if lowered.contains("disabled") {
        MSG_DISABLED
    } else if lowered.contains("unavailable") {
        MSG_UNAVAILABLE
    } else {
        MSG_GENERIC
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_pair() {
        let validation = validate_coordinates(Some("46.2044"), Some("6.1432"));
        assert!(validation.is_valid());
        assert_eq!(validation.first_message(), None);
    }

    #[test]
    fn test_inputs_are_trimmed() {
        let validation = validate_coordinates(Some("  46.2044 "), Some("\t6.1432\n"));
        assert!(validation.is_valid());
    }

    #[test]
    fn test_missing_fields_are_required() {
        let validation = validate_coordinates(None, Some(""));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::Required));
        assert_eq!(validation.longitude, Some(CoordinateFieldError::Required));
        assert_eq!(validation.latitude_message(), Some("La latitude est requise"));
        assert_eq!(
            validation.longitude_message(),
            Some("La longitude est requise")
        );
    }

    #[test]
    fn test_blank_field_is_required() {
        let validation = validate_coordinates(Some("   "), Some("6.1"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::Required));
        assert_eq!(validation.longitude, None);
    }

    #[test]
    fn test_non_numeric_field() {
        let validation = validate_coordinates(Some("abc"), Some("6.1"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::NotANumber));
        assert_eq!(
            validation.latitude_message(),
            Some("La latitude doit être un nombre")
        );
    }

    #[test]
    fn test_comma_decimal_separator_is_rejected() {
        let validation = validate_coordinates(Some("46,2044"), Some("6.1432"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::NotANumber));
    }

    #[test]
    fn test_nan_is_not_a_number() {
        let validation = validate_coordinates(Some("NaN"), Some("6.1"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::NotANumber));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        assert!(validate_coordinates(Some("90"), Some("180")).is_valid());
        assert!(validate_coordinates(Some("-90"), Some("-180")).is_valid());
    }

    #[test]
    fn test_out_of_range_values() {
        let validation = validate_coordinates(Some("90.0001"), Some("-180.5"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::OutOfRange));
        assert_eq!(validation.longitude, Some(CoordinateFieldError::OutOfRange));
        assert_eq!(
            validation.latitude_message(),
            Some("La latitude doit être comprise entre -90 et 90")
        );
        assert_eq!(
            validation.longitude_message(),
            Some("La longitude doit être comprise entre -180 et 180")
        );
    }

    #[test]
    fn test_infinity_fails_the_range_check() {
        let validation = validate_coordinates(Some("inf"), Some("-inf"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::OutOfRange));
        assert_eq!(validation.longitude, Some(CoordinateFieldError::OutOfRange));
    }

    #[test]
    fn test_exponent_notation_parses() {
        let validation = validate_coordinates(Some("1e2"), Some("1e2"));
        assert_eq!(validation.latitude, Some(CoordinateFieldError::OutOfRange));
        assert_eq!(validation.longitude, None);
    }

    #[test]
    fn test_first_message_prefers_latitude() {
        let validation = validate_coordinates(Some("abc"), Some("def"));
        assert_eq!(
            validation.first_message(),
            Some("La latitude doit être un nombre")
        );
    }

    #[test]
    fn test_parse_coordinates_accepts_valid_pair() {
        let coords = parse_coordinates(" 46.2044", "6.1432 ").unwrap();
        assert_eq!(coords.latitude, 46.2044);
        assert_eq!(coords.longitude, 6.1432);
    }

    #[test]
    fn test_parse_coordinates_rejects_invalid_pair() {
        assert!(parse_coordinates("91", "0").is_none());
        assert!(parse_coordinates("abc", "0").is_none());
        assert!(parse_coordinates("", "0").is_none());
    }

    #[test]
    fn test_format_north_east() {
        assert_eq!(
            format_coordinates(Some(46.2044), Some(6.1432)),
            "46.2044°N, 6.1432°E"
        );
    }

    #[test]
    fn test_format_south_west_uses_ouest() {
        assert_eq!(
            format_coordinates(Some(-33.8688), Some(-123.5)),
            "33.8688°S, 123.5000°O"
        );
    }

    #[test]
    fn test_format_zero_is_north_east() {
        assert_eq!(format_coordinates(Some(0.0), Some(0.0)), "0.0000°N, 0.0000°E");
    }

    #[test]
    fn test_format_custom_precision() {
        assert_eq!(
            format_coordinates_precision(Some(48.117266), Some(-1.677793), 2),
            "48.12°N, 1.68°O"
        );
    }

    #[test]
    fn test_format_missing_component() {
        assert_eq!(
            format_coordinates(None, Some(6.1432)),
            "Coordonnées non disponibles"
        );
        assert_eq!(format_coordinates(Some(46.0), None), "Coordonnées non disponibles");
    }

    #[test]
    fn test_format_non_finite_component() {
        assert_eq!(
            format_coordinates(Some(f64::NAN), Some(6.1)),
            "Coordonnées invalides"
        );
        assert_eq!(
            format_coordinates(Some(46.0), Some(f64::INFINITY)),
            "Coordonnées invalides"
        );
    }

    #[test]
    fn test_classify_typed_kinds() {
        assert_eq!(
            classify_location_error(&LocationError::PermissionDenied),
            "Permission de localisation refusée. Autorisez l'accès dans les paramètres."
        );
        assert_eq!(
            classify_location_error(&LocationError::Timeout),
            "Délai d'attente dépassé. Vérifiez votre signal GPS et réessayez."
        );
        assert_eq!(
            classify_location_error(&LocationError::ServicesDisabled),
            "GPS désactivé. Activez la localisation dans les paramètres."
        );
        assert_eq!(
            classify_location_error(&LocationError::Unavailable("no receiver".to_string())),
            "Service de localisation indisponible. Vérifiez votre connexion."
        );
    }

    #[test]
    fn test_classify_unknown_by_keyword() {
        let timeout = LocationError::Unknown("GPS TIMEOUT reached".to_string());
        assert_eq!(
            classify_location_error(&timeout),
            "Délai d'attente dépassé. Vérifiez votre signal GPS et réessayez."
        );

        let disabled = LocationError::Unknown("receiver disabled by profile".to_string());
        assert_eq!(
            classify_location_error(&disabled),
            "GPS désactivé. Activez la localisation dans les paramètres."
        );

        let permission = LocationError::Unknown("Permission refused".to_string());
        assert_eq!(
            classify_location_error(&permission),
            "Permission de localisation refusée. Autorisez l'accès dans les paramètres."
        );

        let unavailable = LocationError::Unknown("position UNAVAILABLE".to_string());
        assert_eq!(
            classify_location_error(&unavailable),
            "Service de localisation indisponible. Vérifiez votre connexion."
        );
    }

    #[test]
    fn test_classify_unknown_falls_back_to_generic() {
        let other = LocationError::Unknown("something odd happened".to_string());
        assert_eq!(
            classify_location_error(&other),
            "Erreur de géolocalisation. Vérifiez vos paramètres de localisation."
        );
    }
}
