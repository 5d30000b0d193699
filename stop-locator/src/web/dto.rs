//! Data transfer objects for web requests and responses.

use serde::{Deserialize, Serialize};

use crate::domain::ResolvedStop;
use crate::search::Strategy;

/// Query string for `GET /stops/nearby`.
#[derive(Debug, Deserialize)]
pub struct NearbyQuery {
    /// Free text, or a `lat,lng` pair
    pub q: String,

    /// Search strategy (defaults to scan)
    #[serde(default)]
    pub strategy: Strategy,
}

/// Query string for `GET /stops/nearby/:coordinates`.
#[derive(Debug, Default, Deserialize)]
pub struct StrategyParam {
    #[serde(default)]
    pub strategy: Strategy,
}

/// Stops near the requested location.
#[derive(Debug, Serialize, Deserialize)]
pub struct NearbyStopsResponse {
    pub stops: Vec<ResolvedStop>,
}

/// Error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
