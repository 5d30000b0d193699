//! Static geocoder for development and testing without API access.
//!
//! Serves fixed query -> candidates mappings, either built in code or
//! loaded from a JSON file of the form
//! `{"spire": [{"lat": 53.3498, "lon": -6.2603}]}`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::Coordinate;

use super::error::GeocodeError;
use super::{GeocodeRequest, Geocoder};

/// Geocoder answering from a fixed table.
///
/// Lookups are case-insensitive and ignore surrounding whitespace. Unknown
/// queries produce no candidates. Region bounds are ignored, as a real
/// provider treats them as a preference rather than a filter.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    entries: Arc<HashMap<String, Vec<Coordinate>>>,
    calls: Arc<AtomicUsize>,
}

impl StaticGeocoder {
    /// Create an empty geocoder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a mapping from a query to its candidates, most relevant first.
    pub fn with(mut self, query: &str, candidates: Vec<Coordinate>) -> Self {
        Arc::make_mut(&mut self.entries).insert(normalize(query), candidates);
        self
    }

    /// Load mappings from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, GeocodeError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| GeocodeError::Fixture {
            message: format!("failed to read {:?}: {}", path, e),
        })?;

        let raw: HashMap<String, Vec<Coordinate>> =
            serde_json::from_str(&json).map_err(|e| GeocodeError::Fixture {
                message: format!("failed to parse {:?}: {}", path, e),
            })?;

        let entries = raw
            .into_iter()
            .map(|(query, candidates)| (normalize(&query), candidates))
            .collect();

        Ok(Self {
            entries: Arc::new(entries),
            calls: Arc::default(),
        })
    }

    /// Number of geocode calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl Geocoder for StaticGeocoder {
    async fn geocode(&self, request: &GeocodeRequest) -> Result<Vec<Coordinate>, GeocodeError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self
            .entries
            .get(&normalize(&request.address))
            .cloned()
            .unwrap_or_default())
    }
}

fn normalize(query: &str) -> String {
    query.trim().to_lowercase()
}
