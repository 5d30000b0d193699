//! Google Geocoding API client.
//!
//! Sends one request per query, carrying the region bounds and region hint
//! so the provider prefers matches inside the service area.

use tracing::{debug, instrument, warn};

use crate::domain::Coordinate;

use super::error::GeocodeError;
use super::types::GeocodeResponse;
use super::{GeocodeRequest, Geocoder};

/// Default base URL for the Geocoding API.
const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/geocode";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the Google geocoder.
#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// API key sent as the `key` query parameter
    pub api_key: String,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeocoderConfig {
    /// Create a new config with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Client for the Google Geocoding API.
#[derive(Debug, Clone)]
pub struct GoogleGeocoder {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl GoogleGeocoder {
    /// Create a new geocoder client.
    pub fn new(config: GeocoderConfig) -> Result<Self, GeocodeError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            api_key: config.api_key,
        })
    }
}

impl Geocoder for GoogleGeocoder {
    #[instrument(skip(self, request), fields(address = %request.address))]
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Coordinate>, GeocodeError> {
        let url = format!("{}/json", self.base_url);
        let sw = request.bounds.southwest;
        let ne = request.bounds.northeast;
        let bounds = format!("{},{}|{},{}", sw.lat(), sw.lon(), ne.lat(), ne.lon());

        let response = self
            .http
            .get(&url)
            .query(&[
                ("address", request.address.as_str()),
                ("bounds", bounds.as_str()),
                ("region", request.region.as_str()),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(GeocodeError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(GeocodeError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GeocodeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let response: GeocodeResponse =
            serde_json::from_str(&body).map_err(|e| GeocodeError::Json {
                message: e.to_string(),
            })?;

        let message = response.error_message.unwrap_or_default();
        match response.status.as_str() {
            "OK" => {}
            "ZERO_RESULTS" => {
                debug!("no candidates");
                return Ok(Vec::new());
            }
            "OVER_QUERY_LIMIT" | "OVER_DAILY_LIMIT" => return Err(GeocodeError::RateLimited),
            "REQUEST_DENIED" => return Err(GeocodeError::Unauthorized),
            other => {
                return Err(GeocodeError::Provider {
                    status: other.to_string(),
                    message,
                });
            }
        }

        // Out-of-range candidates are dropped individually
        let candidates: Vec<Coordinate> = response
            .results
            .iter()
            .filter_map(|r| {
                let loc = r.geometry.location;
                Coordinate::new(loc.lat, loc.lng)
                    .inspect_err(|e| {
                        warn!(
                            error = %e,
                            formatted_address = r.formatted_address.as_deref().unwrap_or(""),
                            "skipping invalid candidate"
                        );
                    })
                    .ok()
            })
            .collect();

        if let Some(first) = response.results.first() {
            debug!(
                candidates = candidates.len(),
                formatted_address = first.formatted_address.as_deref().unwrap_or(""),
                "geocoded"
            );
        }

        Ok(candidates)
    }
}
