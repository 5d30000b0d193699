//! Stop records as stored and as returned to callers.

use serde::{Deserialize, Serialize};

use super::coordinate::{Coordinate, InvalidCoordinate};

/// A stop as persisted in the store.
///
/// Coordinates are kept as text because the source feed provides them that
/// way; they are only parsed when a stop is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRecord {
    #[serde(default)]
    pub stop_id: String,
    pub stop_name: String,
    pub stop_number: String,
    pub stop_lat: String,
    pub stop_lon: String,
}

impl StopRecord {
    /// Parse the stored coordinate text.
    ///
    /// Returns the raw numbers without range validation; callers decide
    /// what an out-of-range value means.
    pub fn parse_position(&self) -> Option<(f64, f64)> {
        let lat = self.stop_lat.parse::<f64>().ok()?;
        let lon = self.stop_lon.parse::<f64>().ok()?;
        Some((lat, lon))
    }

    /// Convert to a resolved stop with numeric coordinates.
    pub fn resolve(&self) -> Result<ResolvedStop, InvalidCoordinate> {
        let (lat, lon) = self
            .parse_position()
            .ok_or_else(|| InvalidCoordinate::Malformed {
                input: format!("{},{}", self.stop_lat, self.stop_lon),
                reason: "stored coordinates are not numbers",
            })?;
        let position = Coordinate::new(lat, lon)?;

        Ok(ResolvedStop {
            stop_id: self.stop_id.clone(),
            stop_name: self.stop_name.clone(),
            stop_number: self.stop_number.clone(),
            stop_lat: position.lat(),
            stop_lon: position.lon(),
        })
    }
}

/// A stop returned from a proximity search, with numeric coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedStop {
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub stop_id: String,
    pub stop_name: String,
    pub stop_number: String,
    pub stop_lat: f64,
    pub stop_lon: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: &str, lon: &str) -> StopRecord {
        StopRecord {
            stop_id: "8220DB000007".to_string(),
            stop_name: "Parnell Square West".to_string(),
            stop_number: "7".to_string(),
            stop_lat: lat.to_string(),
            stop_lon: lon.to_string(),
        }
    }

    #[test]
    fn resolve_parses_text_coordinates() {
        let stop = record("53.3500", "-6.2600").resolve().unwrap();
        assert_eq!(stop.stop_id, "8220DB000007");
        assert_eq!(stop.stop_number, "7");
        assert_eq!(stop.stop_lat, 53.35);
        assert_eq!(stop.stop_lon, -6.26);
    }

    #[test]
    fn resolve_rejects_malformed_text() {
        assert!(record("fifty-three", "-6.26").resolve().is_err());
        assert!(record("53.35", "").resolve().is_err());
        assert!(record("153.35", "-6.26").resolve().is_err());
    }

    #[test]
    fn parse_position_is_strict() {
        assert_eq!(record("53.35", "-6.26").parse_position(), Some((53.35, -6.26)));
        assert_eq!(record(" 53.35", "-6.26").parse_position(), None);
    }

    #[test]
    fn deserialize_stored_document() {
        let json = r#"{
            "_id": "5f0c8b1e",
            "stop_id": "8220DB000007",
            "stop_name": "Parnell Square West",
            "stop_number": "7",
            "stop_lat": "53.352241",
            "stop_lon": "-6.263695"
        }"#;
        let stop: StopRecord = serde_json::from_str(json).unwrap();
        assert_eq!(stop.stop_lat, "53.352241");
    }

    #[test]
    fn deserialize_rejects_numeric_coordinates() {
        let json = r#"{
            "stop_name": "Parnell Square West",
            "stop_number": "7",
            "stop_lat": 53.352241,
            "stop_lon": -6.263695
        }"#;
        assert!(serde_json::from_str::<StopRecord>(json).is_err());
    }

    #[test]
    fn resolved_stop_wire_format() {
        let stop = record("53.3500", "-6.2600").resolve().unwrap();
        let json = serde_json::to_value(&stop).unwrap();
        assert_eq!(json["stop_id"], "8220DB000007");
        assert_eq!(json["stop_lat"], 53.35);
        assert_eq!(json["stop_lon"], -6.26);

        let anonymous = ResolvedStop {
            stop_id: String::new(),
            ..stop
        };
        let json = serde_json::to_value(&anonymous).unwrap();
        assert!(json.get("stop_id").is_none());
    }
}
