//! Geographic coordinate type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a coordinate cannot be constructed or parsed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidCoordinate {
    /// Latitude outside [-90, 90] or not finite
    #[error("latitude {0} is out of range")]
    Latitude(f64),

    /// Longitude outside [-180, 180] or not finite
    #[error("longitude {0} is out of range")]
    Longitude(f64),

    /// Input was not of the form `lat,lng`
    #[error("malformed coordinate pair {input:?}: {reason}")]
    Malformed { input: String, reason: &'static str },
}

/// A validated (latitude, longitude) pair in decimal degrees.
///
/// Latitude is always within [-90, 90] and longitude within [-180, 180].
///
/// # Examples
///
/// ```
/// use stop_locator::domain::Coordinate;
///
/// let dublin: Coordinate = "53.3498,-6.2603".parse().unwrap();
/// assert_eq!(dublin.lat(), 53.3498);
/// assert_eq!(dublin.lon(), -6.2603);
///
/// // Whitespace, missing halves and extra fields are rejected
/// assert!("53.3498, -6.2603".parse::<Coordinate>().is_err());
/// assert!("53.3498".parse::<Coordinate>().is_err());
/// assert!("1,2,3".parse::<Coordinate>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lon: f64,
}

impl Coordinate {
    /// Create a coordinate, checking both axes are in range.
    pub fn new(lat: f64, lon: f64) -> Result<Self, InvalidCoordinate> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(InvalidCoordinate::Latitude(lat));
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(InvalidCoordinate::Longitude(lon));
        }
        Ok(Self { lat, lon })
    }

    /// Build a coordinate the caller has already range-checked or clamped.
    pub(crate) const fn new_unchecked(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Latitude in decimal degrees.
    pub fn lat(&self) -> f64 {
        self.lat
    }

    /// Longitude in decimal degrees.
    pub fn lon(&self) -> f64 {
        self.lon
    }

    /// Parse a `lat,lng` pair with no surrounding whitespace.
    pub fn parse_pair(s: &str) -> Result<Self, InvalidCoordinate> {
        let malformed = |reason| InvalidCoordinate::Malformed {
            input: s.to_string(),
            reason,
        };

        let mut parts = s.split(',');
        let (Some(lat), Some(lon), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(malformed("expected exactly one comma"));
        };

        let lat: f64 = lat
            .parse()
            .map_err(|_| malformed("latitude is not a number"))?;
        let lon: f64 = lon
            .parse()
            .map_err(|_| malformed("longitude is not a number"))?;

        Self::new(lat, lon)
    }

    /// Planar distance in degrees. Only meaningful for ranking nearby points.
    pub fn degree_distance(&self, other: &Coordinate) -> f64 {
        (self.lat - other.lat).hypot(self.lon - other.lon)
    }
}

impl FromStr for Coordinate {
    type Err = InvalidCoordinate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_pair(s)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lon)
    }
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    lat: f64,
    lon: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = InvalidCoordinate;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Coordinate::new(raw.lat, raw.lon)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        RawCoordinate {
            lat: c.lat,
            lon: c.lon,
        }
    }
}
