//! Caching layer for geocoding responses.
//!
//! Geocoding quota is metered per request and the same landmarks are
//! searched repeatedly, so provider answers are cached by normalized query
//! text. Only successful answers are cached, including empty ones; failures
//! always reach the provider again on the next request.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tracing::debug;

use crate::domain::Coordinate;
use crate::geocoder::{GeocodeError, GeocodeRequest, Geocoder};

/// Cache key: (normalized address, region hint, bounds).
type GeocodeKey = (String, String, String);

/// Cached provider answer.
type GeocodeEntry = Arc<Vec<Coordinate>>;

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(24 * 60 * 60),
            max_capacity: 1000,
        }
    }
}

/// Geocoder with caching.
///
/// Wraps any [`Geocoder`] and caches its candidate lists.
#[derive(Clone)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: MokaCache<GeocodeKey, GeocodeEntry>,
}

impl<G> CachedGeocoder<G> {
    /// Create a new cached geocoder.
    pub fn new(inner: G, config: &CacheConfig) -> Self {
        let cache = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { inner, cache }
    }

    /// Access the underlying geocoder.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.cache.invalidate_all();
    }

    fn key(request: &GeocodeRequest) -> GeocodeKey {
        let sw = request.bounds.southwest;
        let ne = request.bounds.northeast;
        (
            request.address.trim().to_lowercase(),
            request.region.to_lowercase(),
            format!("{sw}|{ne}"),
        )
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Coordinate>, GeocodeError> {
        let key = Self::key(request);

        if let Some(cached) = self.cache.get(&key).await {
            debug!(address = %request.address, "geocode cache hit");
            return Ok(cached.as_ref().clone());
        }

        let candidates = self.inner.geocode(request).await?;
        self.cache.insert(key, Arc::new(candidates.clone())).await;

        Ok(candidates)
    }
}
