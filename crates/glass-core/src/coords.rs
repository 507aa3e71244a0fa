//! Coordinate identity shared by favorites and city search.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A place key: latitude and longitude rounded to 4 decimals, `"{lat},{lon}"`.
///
/// Two locations with equal keys are the same place, whatever their
/// display names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CoordinateId(String);

impl CoordinateId {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self(format!("{:.4},{:.4}", lat, lon))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CoordinateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CoordinateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl PartialEq<str> for CoordinateId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    pub fn id(&self) -> CoordinateId {
        CoordinateId::new(self.latitude, self.longitude)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_rounds_to_four_decimals() {
        assert_eq!(
            CoordinateId::new(40.71280, -74.00600),
            CoordinateId::new(40.712804, -74.006001)
        );
        assert_eq!(CoordinateId::new(40.7128, -74.006).as_str(), "40.7128,-74.0060");
    }

    #[test]
    fn test_identity_differs_when_rounding_differs() {
        assert_ne!(
            CoordinateId::new(40.7128, -74.006),
            CoordinateId::new(40.7129, -74.006)
        );
    }

    #[test]
    fn test_identity_serializes_as_plain_string() {
        let id = CoordinateId::new(51.5074, -0.1278);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"51.5074,-0.1278\"");
    }

    #[test]
    fn test_coordinates_id() {
        let c = Coordinates::new(47.6062, -122.3321);
        assert_eq!(c.id().to_string(), "47.6062,-122.3321");
    }
}
