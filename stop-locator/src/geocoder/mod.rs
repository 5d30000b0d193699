//! Geocoding: free text to coordinates.
//!
//! [`Geocoder`] is the seam to the external provider. [`GoogleGeocoder`]
//! talks to the Google Geocoding API; [`StaticGeocoder`] answers from a fixed
//! table. [`LocationResolver`] sits on top of either and enforces the
//! service-region contract:
//! - a single provider request per query, carrying region bounds and hint
//! - only the first candidate is considered
//! - candidates outside the region resolve to [`Resolution::NotFound`]

mod client;
mod error;
mod mock;
mod resolver;
mod types;

use std::future::Future;

use crate::domain::{BoundingBox, Coordinate};

pub use client::{GeocoderConfig, GoogleGeocoder};
pub use error::GeocodeError;
pub use mock::StaticGeocoder;
pub use resolver::{LocationResolver, Resolution, ServiceRegion};

/// A single geocoding request.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeRequest {
    /// Free-text address, landmark or keyword.
    pub address: String,
    /// Area the provider should prefer matches in.
    pub bounds: BoundingBox,
    /// Region hint (ccTLD).
    pub region: String,
}

impl GeocodeRequest {
    pub fn new(address: impl Into<String>, bounds: BoundingBox, region: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            bounds,
            region: region.into(),
        }
    }
}

/// A geocoding provider.
pub trait Geocoder: Send + Sync {
    /// Candidate positions for the request, most relevant first.
    ///
    /// An empty list means the provider found nothing.
    fn geocode(
        &self,
        request: &GeocodeRequest,
    ) -> impl Future<Output = Result<Vec<Coordinate>, GeocodeError>> + Send;
}
