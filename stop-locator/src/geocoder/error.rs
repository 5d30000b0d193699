//! Geocoder error types.

/// Errors that can occur when calling a geocoding provider.
#[derive(Debug, thiserror::Error)]
pub enum GeocodeError {
    /// HTTP request failed (connection refused, DNS, TLS, ...)
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    /// The provider did not answer within the configured timeout
    #[error("geocoding request timed out")]
    Timeout,

    /// Invalid API key or request denied
    #[error("unauthorized: check MAPS_API_KEY")]
    Unauthorized,

    /// Quota exhausted or rate limited by the provider
    #[error("rate limited by geocoding provider")]
    RateLimited,

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Provider answered with a non-OK status in the response body
    #[error("provider status {status}: {message}")]
    Provider { status: String, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Fixture data for the static geocoder could not be loaded
    #[error("fixture error: {message}")]
    Fixture { message: String },
}

impl GeocodeError {
    /// Whether the same request might succeed if tried again later.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GeocodeError::Http(_) | GeocodeError::Timeout | GeocodeError::RateLimited
        ) || matches!(self, GeocodeError::Api { status, .. } if *status >= 500)
    }
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GeocodeError::Timeout
        } else {
            GeocodeError::Http(err)
        }
    }
}
