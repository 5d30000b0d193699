//! Free-text location resolution constrained to a service region.

use tracing::{debug, warn};

use crate::domain::{BoundingBox, Coordinate, Edge};

use super::error::GeocodeError;
use super::{GeocodeRequest, Geocoder};

/// The geographic area a deployment serves.
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceRegion {
    /// Results outside this box are rejected.
    pub bounds: BoundingBox,
    /// Region hint passed to the provider (ccTLD, e.g. "ie").
    pub region_hint: String,
}

impl ServiceRegion {
    pub fn new(bounds: BoundingBox, region_hint: impl Into<String>) -> Self {
        Self {
            bounds,
            region_hint: region_hint.into(),
        }
    }
}

impl Default for ServiceRegion {
    fn default() -> Self {
        Self::new(BoundingBox::dublin(), "ie")
    }
}

/// Outcome of resolving a text query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolution {
    /// The query resolved to a position inside the service region.
    Found(Coordinate),
    /// No usable position: no candidates, or the best one lies outside the region.
    NotFound,
}

impl Resolution {
    pub fn coordinate(self) -> Option<Coordinate> {
        match self {
            Resolution::Found(c) => Some(c),
            Resolution::NotFound => None,
        }
    }
}

/// Resolves text to a coordinate inside a fixed service region.
///
/// Takes the provider's first candidate only, trusting its relevance order.
#[derive(Debug, Clone)]
pub struct LocationResolver<G> {
    geocoder: G,
    region: ServiceRegion,
}

impl<G: Geocoder> LocationResolver<G> {
    pub fn new(geocoder: G, region: ServiceRegion) -> Self {
        Self { geocoder, region }
    }

    pub fn region(&self) -> &ServiceRegion {
        &self.region
    }

    pub fn geocoder(&self) -> &G {
        &self.geocoder
    }

    /// Resolve `text`, propagating provider failures.
    pub async fn resolve(&self, text: &str) -> Result<Resolution, GeocodeError> {
        let request = GeocodeRequest::new(
            text,
            self.region.bounds,
            self.region.region_hint.as_str(),
        );
        let candidates = self.geocoder.geocode(&request).await?;

        let Some(first) = candidates.first() else {
            debug!(query = text, "no geocoding candidates");
            return Ok(Resolution::NotFound);
        };

        if !self.region.bounds.contains(first, Edge::Inclusive) {
            debug!(query = text, candidate = %first, "candidate outside service region");
            return Ok(Resolution::NotFound);
        }

        Ok(Resolution::Found(*first))
    }

    /// Resolve `text`, logging any provider failure and treating it as not found.
    pub async fn resolve_or_not_found(&self, text: &str) -> Resolution {
        match self.resolve(text).await {
            Ok(resolution) => resolution,
            Err(e) => {
                warn!(query = text, error = %e, "geocoding failed");
                Resolution::NotFound
            }
        }
    }
}
