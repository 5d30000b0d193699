//! Google Geocoding API response types.
//!
//! Only the fields needed to extract candidate positions are modelled.

use serde::Deserialize;

/// Top-level geocoding response.
#[derive(Debug, Deserialize)]
pub struct GeocodeResponse {
    #[serde(default)]
    pub results: Vec<GeocodeResult>,

    /// `OK`, `ZERO_RESULTS`, `OVER_QUERY_LIMIT`, `REQUEST_DENIED`, ...
    pub status: String,

    #[serde(default)]
    pub error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodeResult {
    #[serde(default)]
    pub formatted_address: Option<String>,
    pub geometry: Geometry,
}

#[derive(Debug, Deserialize)]
pub struct Geometry {
    pub location: LatLng,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ok_response() {
        let json = r#"{
            "results": [{
                "formatted_address": "O'Connell Street Upper, Dublin 1, Ireland",
                "geometry": {
                    "location": { "lat": 53.3509, "lng": -6.2603 },
                    "location_type": "GEOMETRIC_CENTER"
                },
                "place_id": "abc"
            }],
            "status": "OK"
        }"#;
        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "OK");
        assert_eq!(response.results.len(), 1);
        assert_eq!(response.results[0].geometry.location.lat, 53.3509);
        assert_eq!(response.results[0].geometry.location.lng, -6.2603);
    }

    #[test]
    fn parse_zero_results() {
        let json = r#"{ "results": [], "status": "ZERO_RESULTS" }"#;
        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn parse_denied_without_results() {
        let json = r#"{ "status": "REQUEST_DENIED", "error_message": "The provided API key is invalid." }"#;
        let response: GeocodeResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.status, "REQUEST_DENIED");
        assert!(response.results.is_empty());
        assert_eq!(
            response.error_message.as_deref(),
            Some("The provided API key is invalid.")
        );
    }
}
