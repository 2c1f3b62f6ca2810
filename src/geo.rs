//! Geo

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean Earth radius used by the haversine formula, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Errors raised when building coordinates.
#[derive(Debug, Error, PartialEq)]
pub enum GeoError {
    /// Latitude outside `[-90, 90]` or not finite.
    #[error("latitude {0} is out of range")]
    InvalidLatitude(f64),

    /// Longitude outside `[-180, 180]` or not finite.
    #[error("longitude {0} is out of range")]
    InvalidLongitude(f64),

    /// Text could not be parsed as a `lat,lng` pair.
    #[error("could not parse coordinates from {0:?}")]
    Unparsable(String),
}

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates", into = "RawCoordinates")]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Build coordinates, rejecting values outside the valid ranges.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::InvalidLatitude`] or [`GeoError::InvalidLongitude`]
    /// when either component is not finite or out of range.
    pub fn new(lat: f64, lng: f64) -> Result<Self, GeoError> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(GeoError::InvalidLatitude(lat));
        }

        if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
            return Err(GeoError::InvalidLongitude(lng));
        }

        Ok(Self { lat, lng })
    }

    /// Build coordinates from two optional columns; both must be present.
    ///
    /// # Errors
    ///
    /// Returns an error when both components are present but invalid.
    pub fn from_parts(lat: Option<f64>, lng: Option<f64>) -> Result<Option<Self>, GeoError> {
        match (lat, lng) {
            (Some(lat), Some(lng)) => Self::new(lat, lng).map(Some),
            _ => Ok(None),
        }
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle distance to `other` in kilometres.
    pub fn distance_km(&self, other: &Self) -> f64 {
        haversine_km(*self, *other)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl std::str::FromStr for Coordinates {
    type Err = GeoError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = value
            .split_once(',')
            .ok_or_else(|| GeoError::Unparsable(value.to_string()))?;

        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|_parse| GeoError::Unparsable(value.to_string()))?;

        let lng = lng
            .trim()
            .parse::<f64>()
            .map_err(|_parse| GeoError::Unparsable(value.to_string()))?;

        Self::new(lat, lng)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawCoordinates {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = GeoError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.lat, raw.lng)
    }
}

impl From<Coordinates> for RawCoordinates {
    fn from(coordinates: Coordinates) -> Self {
        Self {
            lat: coordinates.lat,
            lng: coordinates.lng,
        }
    }
}

/// Great-circle distance between two points using the haversine formula.
pub fn haversine_km(a: Coordinates, b: Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lng = (b.lng - a.lng).to_radians();

    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lng / 2.0).sin().powi(2);

    // Clamp guards against rounding drift pushing `h` past 1.0 for antipodal points.
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Haversine distance rounded to the nearest whole kilometre, as displayed.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "distance is non-negative and bounded by half the Earth's circumference"
)]
pub fn rounded_distance_km(a: Coordinates, b: Coordinates) -> u64 {
    haversine_km(a, b).round() as u64
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn buenos_aires() -> Coordinates {
        Coordinates { lat: -34.6037, lng: -58.3816 }
    }

    fn cordoba() -> Coordinates {
        Coordinates { lat: -31.4201, lng: -64.1888 }
    }

    #[test]
    fn distance_is_symmetric() {
        let there = haversine_km(buenos_aires(), cordoba());
        let back = haversine_km(cordoba(), buenos_aires());

        assert!((there - back).abs() < 1e-9, "distance should be symmetric");
    }

    #[test]
    fn distance_to_self_is_zero() {
        assert!(haversine_km(cordoba(), cordoba()).abs() < f64::EPSILON);
        assert_eq!(rounded_distance_km(cordoba(), cordoba()), 0);
    }

    #[test]
    fn buenos_aires_to_cordoba_is_about_647_km() {
        let km = rounded_distance_km(buenos_aires(), cordoba());

        assert!((642..=652).contains(&km), "expected ~647 km, got {km}");
    }

    #[test]
    fn antipodal_points_do_not_exceed_half_circumference() -> TestResult {
        let a = Coordinates::new(0.0, 0.0)?;
        let b = Coordinates::new(0.0, 180.0)?;

        let km = haversine_km(a, b);

        assert!((km - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);

        Ok(())
    }

    #[test]
    fn new_rejects_out_of_range_components() {
        assert_eq!(
            Coordinates::new(91.0, 0.0),
            Err(GeoError::InvalidLatitude(91.0))
        );
        assert_eq!(
            Coordinates::new(0.0, -180.5),
            Err(GeoError::InvalidLongitude(-180.5))
        );
        assert!(Coordinates::new(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn from_parts_requires_both_components() -> TestResult {
        assert_eq!(Coordinates::from_parts(Some(1.0), None)?, None);
        assert_eq!(Coordinates::from_parts(None, Some(1.0))?, None);
        assert!(Coordinates::from_parts(Some(1.0), Some(2.0))?.is_some());

        Ok(())
    }

    #[test]
    fn parses_comma_separated_pairs() -> TestResult {
        let parsed: Coordinates = " -34.6037 , -58.3816 ".parse()?;

        assert_eq!(parsed, buenos_aires());
        assert!("nope".parse::<Coordinates>().is_err());
        assert!("100,0".parse::<Coordinates>().is_err());

        Ok(())
    }
}
