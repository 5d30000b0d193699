//! Axis-aligned bounding boxes in latitude/longitude space.

use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, InvalidCoordinate};

/// Number of decimal places used when bounds are compared against stored text.
pub const BOUND_PRECISION: usize = 6;

/// How points lying exactly on an edge of a box are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Points on an edge are inside.
    #[default]
    Inclusive,
    /// Points on an edge are outside.
    Exclusive,
}

/// A rectangle defined by its southwest and northeast corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub southwest: Coordinate,
    pub northeast: Coordinate,
}

impl BoundingBox {
    /// Greater Dublin, used to keep geocoding results inside the service area.
    pub const fn dublin() -> Self {
        Self {
            southwest: Coordinate::new_unchecked(53.14860, -6.56495),
            northeast: Coordinate::new_unchecked(53.49337, -6.05788),
        }
    }

    /// Create a box from its corners. Corners may be given in either order.
    pub fn new(a: Coordinate, b: Coordinate) -> Self {
        Self::from_raw(
            a.lat().min(b.lat()),
            a.lon().min(b.lon()),
            a.lat().max(b.lat()),
            a.lon().max(b.lon()),
        )
    }

    /// A box extending `margin` degrees either side of `center` on both axes.
    ///
    /// The result is clamped to valid latitude/longitude ranges.
    pub fn around(center: Coordinate, margin: f64) -> Self {
        let clamp_lat = |v: f64| v.clamp(-90.0, 90.0);
        let clamp_lon = |v: f64| v.clamp(-180.0, 180.0);

        Self::from_raw(
            clamp_lat(center.lat() - margin),
            clamp_lon(center.lon() - margin),
            clamp_lat(center.lat() + margin),
            clamp_lon(center.lon() + margin),
        )
    }

    /// Parse `sw_lat,sw_lng,ne_lat,ne_lng`.
    pub fn parse(s: &str) -> Result<Self, InvalidCoordinate> {
        let malformed = |reason| InvalidCoordinate::Malformed {
            input: s.to_string(),
            reason,
        };

        let parts: Vec<&str> = s.split(',').collect();
        let [sw_lat, sw_lon, ne_lat, ne_lon] = parts.as_slice() else {
            return Err(malformed("expected four comma-separated numbers"));
        };

        let sw = Coordinate::parse_pair(&format!("{sw_lat},{sw_lon}"))?;
        let ne = Coordinate::parse_pair(&format!("{ne_lat},{ne_lon}"))?;
        Ok(Self::new(sw, ne))
    }

    /// Every argument must already be a valid latitude/longitude.
    fn from_raw(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> Self {
        Self {
            southwest: Coordinate::new_unchecked(min_lat, min_lon),
            northeast: Coordinate::new_unchecked(max_lat, max_lon),
        }
    }

    pub fn min_lat(&self) -> f64 {
        self.southwest.lat()
    }

    pub fn max_lat(&self) -> f64 {
        self.northeast.lat()
    }

    pub fn min_lon(&self) -> f64 {
        self.southwest.lon()
    }

    pub fn max_lon(&self) -> f64 {
        self.northeast.lon()
    }

    /// Round every bound to [`BOUND_PRECISION`] decimal places.
    ///
    /// After quantizing, each bound equals the value obtained by parsing its
    /// fixed-precision text form, so numeric and textual comparisons agree.
    pub fn quantized(&self) -> Self {
        let q = |v: f64| {
            let scale = 10f64.powi(BOUND_PRECISION as i32);
            (v * scale).round() / scale
        };
        Self::from_raw(
            q(self.min_lat()),
            q(self.min_lon()),
            q(self.max_lat()),
            q(self.max_lon()),
        )
    }

    /// Whether a raw (lat, lon) pair lies inside the box.
    pub fn contains_point(&self, lat: f64, lon: f64, edge: Edge) -> bool {
        match edge {
            Edge::Inclusive => {
                self.min_lat() <= lat
                    && lat <= self.max_lat()
                    && self.min_lon() <= lon
                    && lon <= self.max_lon()
            }
            Edge::Exclusive => {
                self.min_lat() < lat
                    && lat < self.max_lat()
                    && self.min_lon() < lon
                    && lon < self.max_lon()
            }
        }
    }

    /// Whether a coordinate lies inside the box.
    pub fn contains(&self, c: &Coordinate, edge: Edge) -> bool {
        self.contains_point(c.lat(), c.lon(), edge)
    }
}

/// Format a bound as fixed-precision text, matching how stops are stored.
pub fn bound_text(v: f64) -> String {
    format!("{v:.prec$}", prec = BOUND_PRECISION)
}
