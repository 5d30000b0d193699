//! Query orchestration: text or coordinates in, nearby stops out.

use tracing::{info, warn};

use crate::domain::{Coordinate, ResolvedStop, SearchQuery};
use crate::geocoder::{GeocodeError, Geocoder, LocationResolver, Resolution};
use crate::search::{ProximitySearch, SearchConfig, SearchError, Strategy};
use crate::store::DocumentStore;

/// Error from locating stops.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error("geocoding failed: {0}")]
    Geocode(#[from] GeocodeError),

    #[error("search failed: {0}")]
    Search(#[from] SearchError),
}

/// Finds stops near a text or coordinate query.
///
/// The resolver and the search engine never call each other; this type
/// sequences them.
pub struct StopLocator<G, S> {
    resolver: LocationResolver<G>,
    store: S,
    config: SearchConfig,
}

impl<G: Geocoder, S: DocumentStore> StopLocator<G, S> {
    pub fn new(resolver: LocationResolver<G>, store: S, config: SearchConfig) -> Self {
        Self {
            resolver,
            store,
            config,
        }
    }

    pub fn resolver(&self) -> &LocationResolver<G> {
        &self.resolver
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find stops near the place `query` describes.
    ///
    /// A text query that resolves to nothing yields an empty list without
    /// touching the store.
    pub async fn locate(
        &self,
        query: &SearchQuery,
        strategy: Strategy,
    ) -> Result<Vec<ResolvedStop>, LocateError> {
        let center = match query {
            SearchQuery::Coordinates(c) => *c,
            SearchQuery::Text(text) => match self.resolver.resolve(text).await? {
                Resolution::Found(c) => c,
                Resolution::NotFound => {
                    info!(query = %text, "location not found");
                    return Ok(Vec::new());
                }
            },
        };

        Ok(self.search_at(center, strategy).await?)
    }

    /// Like [`locate`](Self::locate), but logs failures and returns no stops.
    pub async fn locate_or_empty(&self, query: &SearchQuery, strategy: Strategy) -> Vec<ResolvedStop> {
        match self.locate(query, strategy).await {
            Ok(stops) => stops,
            Err(e) => {
                warn!(error = %e, "locating stops failed");
                Vec::new()
            }
        }
    }

    async fn search_at(
        &self,
        center: Coordinate,
        strategy: Strategy,
    ) -> Result<Vec<ResolvedStop>, SearchError> {
        ProximitySearch::new(&self.store, &self.config)
            .find_nearby(center, strategy)
            .await
    }
}
