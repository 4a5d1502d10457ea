//! Struct definitions and implementations for [`Coordinate`].
//!
//! Reports reach this crate in several shapes. The document store keeps
//! `{ "lat": .., "lng": .. }`, the REST backend answers with
//! `{ "latitude": .., "longitude": .. }` and stores locations as a
//! `"lat,lon"` string. [`deserialize_optional`] accepts all of them and
//! turns anything incomplete into [`None`] instead of an error.

use std::{fmt, str::FromStr};

use serde::{de::IgnoredAny, Deserialize, Deserializer, Serialize};

use super::error::ProximityError;

/// A [`Coordinate`] is a position on the Earth's surface in decimal
/// degrees (WGS-84).
///
/// Constructing a coordinate never checks the range. Values outside
/// [-90, 90] / [-180, 180] still produce a mathematically defined
/// distance; use [`Coordinate::validated`] or the [`FromStr`]
/// implementation when the input comes from text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    pub longitude: f64,
}

/// Kathmandu city centre. Used when the user's position is unknown.
pub const KATHMANDU: Coordinate = Coordinate {
    latitude: 27.7172,
    longitude: 85.3240,
};

impl Coordinate {
    /// Creates a coordinate without any range check.
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Coordinate {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, rejecting latitudes outside [-90, 90] and
    /// longitudes outside [-180, 180]. NaN is rejected too.
    pub fn validated(latitude: f64, longitude: f64) -> Result<Self, ProximityError> {
        let coordinate = Coordinate::new(latitude, longitude);
        if coordinate.is_in_range() {
            Ok(coordinate)
        } else {
            Err(ProximityError::OutOfRange {
                latitude,
                longitude,
            })
        }
    }

    /// Whether both components lie within their geographic range.
    pub fn is_in_range(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

/// Parses the `"lat,lon"` storage format. Surrounding whitespace around
/// each component is ignored.
impl FromStr for Coordinate {
    type Err = ProximityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ProximityError::MalformedLocation(s.to_string());
        let (latitude, longitude) = s.split_once(',').ok_or_else(malformed)?;
        let latitude = latitude.trim().parse::<f64>().map_err(|_| malformed())?;
        let longitude = longitude.trim().parse::<f64>().map_err(|_| malformed())?;
        Coordinate::validated(latitude, longitude)
    }
}

//------------------------------------------------------------------
// Lenient deserialization
//------------------------------------------------------------------

/// One latitude or longitude value as found in the wild.
#[derive(Deserialize)]
#[serde(untagged)]
enum Component {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl Component {
    fn value(&self) -> Option<f64> {
        match self {
            Component::Number(value) => Some(*value),
            Component::Text(text) => text.trim().parse().ok(),
            Component::Other(_) => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LocationRepr {
    Fields {
        #[serde(default, alias = "lat")]
        latitude: Option<Component>,
        #[serde(default, alias = "lng", alias = "lon")]
        longitude: Option<Component>,
    },
    Text(String),
    Other(IgnoredAny),
}

impl LocationRepr {
    fn into_coordinate(self) -> Option<Coordinate> {
        match self {
            LocationRepr::Fields {
                latitude,
                longitude,
            } => {
                let latitude = latitude.as_ref().and_then(Component::value)?;
                let longitude = longitude.as_ref().and_then(Component::value)?;
                Some(Coordinate::new(latitude, longitude))
            }
            LocationRepr::Text(text) => match text.parse() {
                Ok(coordinate) => Some(coordinate),
                Err(e) => {
                    debug!("ignoring location {:?}: {}", text, e);
                    None
                }
            },
            LocationRepr::Other(_) => None,
        }
    }
}

/// Deserializes an optional location from any of the known shapes.
///
/// Use with `#[serde(default, deserialize_with = "...")]`. A missing,
/// null, partial or unparsable location yields [`None`].
pub fn deserialize_optional<'de, D>(deserializer: D) -> Result<Option<Coordinate>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr = Option::<LocationRepr>::deserialize(deserializer)?;
    Ok(repr.and_then(LocationRepr::into_coordinate))
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------

#[cfg(test)]
mod coordinate_tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "deserialize_optional")]
        location: Option<Coordinate>,
    }

    fn location_of(json: &str) -> Option<Coordinate> {
        serde_json::from_str::<Holder>(json).unwrap().location
    }

    #[test]
    fn test_parse_storage_format() {
        let coordinate: Coordinate = " 27.7172 , 85.3240 ".parse().unwrap();
        assert_eq!(coordinate, KATHMANDU);
    }

    #[test]
    fn test_parse_rejects_malformed_text() {
        for text in ["", "27.7172", "abc,85.3", "27.7,85.3,1.0"] {
            assert!(
                matches!(
                    text.parse::<Coordinate>(),
                    Err(ProximityError::MalformedLocation(_))
                ),
                "{text:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_parse_rejects_out_of_range() {
        assert_eq!(
            "91.0,10.0".parse::<Coordinate>(),
            Err(ProximityError::OutOfRange {
                latitude: 91.0,
                longitude: 10.0
            })
        );
        assert!("10.0,-180.5".parse::<Coordinate>().is_err());
        assert!("NaN,10.0".parse::<Coordinate>().is_err());
    }

    #[test]
    fn test_range_boundaries_are_valid() {
        assert!(Coordinate::validated(90.0, 180.0).is_ok());
        assert!(Coordinate::validated(-90.0, -180.0).is_ok());
        assert!(!Coordinate::new(0.0, 200.0).is_in_range());
    }

    #[test]
    fn test_display_is_storage_format() {
        let coordinate = Coordinate::new(28.2096, 83.9856);
        assert_eq!(coordinate.to_string(), "28.2096,83.9856");
        assert_eq!(coordinate.to_string().parse::<Coordinate>(), Ok(coordinate));
    }

    #[test]
    fn test_deserialize_document_store_shape() {
        assert_eq!(
            location_of(r#"{"location": {"lat": 27.7172, "lng": 85.324}}"#),
            Some(KATHMANDU)
        );
    }

    #[test]
    fn test_deserialize_rest_shape() {
        assert_eq!(
            location_of(r#"{"location": {"latitude": 28, "longitude": "83.5"}}"#),
            Some(Coordinate::new(28.0, 83.5))
        );
    }

    #[test]
    fn test_deserialize_text_shape() {
        assert_eq!(
            location_of(r#"{"location": "27.7172,85.3240"}"#),
            Some(KATHMANDU)
        );
        assert_eq!(location_of(r#"{"location": "somewhere in Patan"}"#), None);
    }

    #[test]
    fn test_deserialize_incomplete_is_none() {
        assert_eq!(location_of(r#"{}"#), None);
        assert_eq!(location_of(r#"{"location": null}"#), None);
        assert_eq!(location_of(r#"{"location": {"lat": 27.7}}"#), None);
        assert_eq!(location_of(r#"{"location": {"lat": null, "lng": 85.3}}"#), None);
        assert_eq!(location_of(r#"{"location": {"lat": true, "lng": 85.3}}"#), None);
        assert_eq!(location_of(r#"{"location": 42}"#), None);
    }

    /// Zero is a real position (Gulf of Guinea), not a missing value.
    #[test]
    fn test_deserialize_zero_is_a_coordinate() {
        assert_eq!(
            location_of(r#"{"location": {"lat": 0, "lng": 0}}"#),
            Some(Coordinate::new(0.0, 0.0))
        );
    }
}
