//! Proximity search over stored stops.
//!
//! Two strategies answer the same question, "which stops lie in the box
//! around this point":
//! - scan reads the whole collection and filters numerically, stopping
//!   once it has enough matches
//! - pushdown hands the store a text range filter and returns every match
//!
//! Both compare against the same quantized box, so apart from the scan's
//! cap and the configured edge policy they select the same stops.

use futures::TryStreamExt;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::domain::{BoundingBox, Coordinate, ResolvedStop, StopRecord};
use crate::store::{Document, DocumentStore, Filter, StoreError};

use super::config::{Ranking, SearchConfig};
use super::predicate::range_filter;

/// Error from proximity search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The store failed to answer or its cursor failed mid-read
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// The store did not finish within the configured timeout
    #[error("store query timed out")]
    Timeout,
}

/// How the search talks to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Read everything, filter locally, cap the result.
    #[default]
    Scan,
    /// Filter in the store with a text range, return every match.
    Pushdown,
}

/// Proximity search over a document store.
pub struct ProximitySearch<'a, S: DocumentStore> {
    store: &'a S,
    config: &'a SearchConfig,
}

impl<'a, S: DocumentStore> ProximitySearch<'a, S> {
    /// Create a new search.
    pub fn new(store: &'a S, config: &'a SearchConfig) -> Self {
        Self { store, config }
    }

    /// The box searched around `center`.
    pub fn search_box(&self, center: Coordinate) -> BoundingBox {
        BoundingBox::around(center, self.config.margin_degrees).quantized()
    }

    /// Find stops near `center`.
    ///
    /// The whole store interaction, including draining the cursor, is
    /// bounded by the configured store timeout.
    #[instrument(skip(self, center), fields(center = %center))]
    pub async fn find_nearby(
        &self,
        center: Coordinate,
        strategy: Strategy,
    ) -> Result<Vec<ResolvedStop>, SearchError> {
        let bbox = self.search_box(center);

        let search = async {
            match strategy {
                Strategy::Scan => self.scan(center, &bbox).await,
                Strategy::Pushdown => self.pushdown(&bbox).await,
            }
        };

        let stops = tokio::time::timeout(self.config.store_timeout(), search)
            .await
            .map_err(|_| SearchError::Timeout)??;

        debug!(count = stops.len(), "nearby stops found");
        Ok(stops)
    }

    /// Find stops near `center`, logging any failure and returning no stops.
    pub async fn find_nearby_or_empty(
        &self,
        center: Coordinate,
        strategy: Strategy,
    ) -> Vec<ResolvedStop> {
        match self.find_nearby(center, strategy).await {
            Ok(stops) => stops,
            Err(e) => {
                warn!(center = %center, error = %e, "proximity search failed");
                Vec::new()
            }
        }
    }

    async fn scan(
        &self,
        center: Coordinate,
        bbox: &BoundingBox,
    ) -> Result<Vec<ResolvedStop>, SearchError> {
        let edge = self.config.edges.scan_edge();
        let limit = self.config.scan_limit;
        let encounter = self.config.ranking == Ranking::Encounter;

        let mut cursor = self
            .store
            .find(&self.config.collection, &Filter::All)
            .await?;
        let mut matches = Vec::new();

        loop {
            // Dropping the cursor early releases the store connection
            if encounter && matches.len() >= limit {
                break;
            }
            let Some(doc) = cursor.try_next().await? else {
                break;
            };
            let Some(record) = decode(doc) else {
                continue;
            };
            let Some((lat, lon)) = record.parse_position() else {
                debug!(stop_number = %record.stop_number, "skipping stop with malformed coordinates");
                continue;
            };
            if !bbox.contains_point(lat, lon, edge) {
                continue;
            }
            match record.resolve() {
                Ok(stop) => matches.push(stop),
                Err(e) => debug!(stop_number = %record.stop_number, error = %e, "skipping stop"),
            }
        }

        if !encounter {
            matches.sort_by(|a, b| distance(center, a).total_cmp(&distance(center, b)));
            matches.truncate(limit);
        }

        Ok(matches)
    }

    async fn pushdown(&self, bbox: &BoundingBox) -> Result<Vec<ResolvedStop>, SearchError> {
        let edge = self.config.edges.pushdown_edge();

        let (filter, local) = match range_filter(bbox, edge) {
            Some(filter) => (filter, false),
            None => {
                warn!(
                    southwest = %bbox.southwest,
                    northeast = %bbox.northeast,
                    "search box not expressible as a text range, filtering locally"
                );
                (Filter::All, true)
            }
        };
        debug!(filter = %filter.to_json(), "pushdown query");

        let mut cursor = self.store.find(&self.config.collection, &filter).await?;
        let mut stops = Vec::new();

        while let Some(doc) = cursor.try_next().await? {
            let Some(record) = decode(doc) else {
                continue;
            };
            if local {
                let inside = record
                    .parse_position()
                    .is_some_and(|(lat, lon)| bbox.contains_point(lat, lon, edge));
                if !inside {
                    continue;
                }
            }
            match record.resolve() {
                Ok(stop) => stops.push(stop),
                Err(e) => {
                    warn!(stop_number = %record.stop_number, error = %e, "matched stop has malformed coordinates")
                }
            }
        }

        Ok(stops)
    }
}

fn decode(doc: Document) -> Option<StopRecord> {
    match serde_json::from_value::<StopRecord>(Value::Object(doc)) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(error = %e, "skipping undecodable stop document");
            None
        }
    }
}

fn distance(center: Coordinate, stop: &ResolvedStop) -> f64 {
    // Resolved stops carry range-checked coordinates
    Coordinate::new_unchecked(stop.stop_lat, stop.stop_lon).degree_distance(&center)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::EdgePolicy;
    use crate::store::{Cursor, MemoryStore};
    use serde_json::json;
    use std::time::Duration;

    fn coord(lat: f64, lon: f64) -> Coordinate {
        Coordinate::new(lat, lon).unwrap()
    }

    fn spire() -> Coordinate {
        coord(53.3498, -6.2603)
    }

    fn stop_doc(number: &str, lat: &str, lon: &str) -> Document {
        let value = json!({
            "_id": format!("oid-{number}"),
            "stop_id": format!("8220DB00{number}"),
            "stop_name": format!("Stop {number}"),
            "stop_number": number,
            "stop_lat": lat,
            "stop_lon": lon,
        });
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    async fn store_with(docs: Vec<Document>) -> MemoryStore {
        let store = MemoryStore::new();
        store.insert_many("stops", docs).await;
        store
    }

    fn numbers(stops: &[ResolvedStop]) -> Vec<&str> {
        stops.iter().map(|s| s.stop_number.as_str()).collect()
    }

    /// Store whose queries never complete.
    struct StalledStore;

    impl DocumentStore for StalledStore {
        async fn find(&self, _: &str, _: &Filter) -> Result<Cursor, StoreError> {
            std::future::pending().await
        }
    }

    /// Store that is always unreachable.
    struct DownStore;

    impl DocumentStore for DownStore {
        async fn find(&self, _: &str, _: &Filter) -> Result<Cursor, StoreError> {
            Err(StoreError::Unavailable("connection refused".to_string()))
        }
    }

    #[tokio::test]
    async fn scan_finds_stops_around_the_spire() {
        let store = store_with(vec![
            stop_doc("1", "53.3500", "-6.2600"),
            stop_doc("2", "53.4000", "-6.2600"),
            stop_doc("3", "53.345000", "-6.255000"),
        ])
        .await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let stops = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
        assert_eq!(numbers(&stops), vec!["1", "3"]);

        let pushed = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
        assert_eq!(numbers(&pushed), vec!["1", "3"]);
        assert_eq!(stops[0].stop_lat, 53.35);
        assert_eq!(stops[0].stop_lon, -6.26);
        assert_eq!(stops[0].stop_id, "8220DB001");
    }

    #[tokio::test]
    async fn scan_stops_at_limit_in_store_order() {
        let docs = (1..=7)
            .map(|i| stop_doc(&i.to_string(), "53.350000", "-6.260000"))
            .collect();
        let store = store_with(docs).await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let stops = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
        assert_eq!(numbers(&stops), vec!["1", "2", "3", "4", "5"]);
    }

    #[tokio::test]
    async fn nearest_ranking_keeps_closest() {
        let store = store_with(vec![
            stop_doc("far", "53.355000", "-6.265000"),
            stop_doc("near", "53.349900", "-6.260400"),
            stop_doc("mid", "53.351000", "-6.262000"),
        ])
        .await;
        let config = SearchConfig::default()
            .with_ranking(Ranking::Nearest)
            .with_scan_limit(2);
        let search = ProximitySearch::new(&store, &config);

        let stops = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
        assert_eq!(numbers(&stops), vec!["near", "mid"]);
    }

    #[tokio::test]
    async fn zero_limit_scans_nothing() {
        let store = store_with(vec![stop_doc("1", "53.350000", "-6.260000")]).await;
        let config = SearchConfig::default().with_scan_limit(0);
        let search = ProximitySearch::new(&store, &config);

        assert!(search.find_nearby(spire(), Strategy::Scan).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn pushdown_returns_every_match() {
        let docs = (1..=7)
            .map(|i| stop_doc(&i.to_string(), "53.350000", "-6.260000"))
            .chain([stop_doc("out", "53.400000", "-6.260000")])
            .collect();
        let store = store_with(docs).await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let stops = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
        assert_eq!(stops.len(), 7);
        assert!(!numbers(&stops).contains(&"out"));
    }

    #[tokio::test]
    async fn malformed_records_are_skipped() {
        let mut missing_name = stop_doc("nameless", "53.350000", "-6.260000");
        missing_name.remove("stop_name");
        let store = store_with(vec![
            stop_doc("bad", "abc", "-6.260000"),
            missing_name,
            stop_doc("good", "53.350000", "-6.260000"),
        ])
        .await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let scanned = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
        assert_eq!(numbers(&scanned), vec!["good"]);

        let pushed = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
        assert_eq!(numbers(&pushed), vec!["good"]);
    }

    #[tokio::test]
    async fn empty_collection_yields_nothing() {
        let store = MemoryStore::new();
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        assert!(search.find_nearby(spire(), Strategy::Scan).await.unwrap().is_empty());
        assert!(search.find_nearby(spire(), Strategy::Pushdown).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_searches_agree() {
        let store = store_with(vec![
            stop_doc("1", "53.350000", "-6.260000"),
            stop_doc("2", "53.345000", "-6.255000"),
        ])
        .await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        for strategy in [Strategy::Scan, Strategy::Pushdown] {
            let first = search.find_nearby(spire(), strategy).await.unwrap();
            let second = search.find_nearby(spire(), strategy).await.unwrap();
            assert_eq!(first, second);
        }
    }

    fn edge_store_docs() -> Vec<Document> {
        // 53.341800 is the southern edge of the box around the Spire
        vec![
            stop_doc("edge", "53.341800", "-6.260000"),
            stop_doc("inside", "53.350000", "-6.260000"),
        ]
    }

    #[tokio::test]
    async fn inclusive_edges_keep_edge_stops() {
        let store = store_with(edge_store_docs()).await;
        let config = SearchConfig::default().with_edges(EdgePolicy::Inclusive);
        let search = ProximitySearch::new(&store, &config);

        for strategy in [Strategy::Scan, Strategy::Pushdown] {
            let stops = search.find_nearby(spire(), strategy).await.unwrap();
            assert_eq!(numbers(&stops), vec!["edge", "inside"]);
        }
    }

    #[tokio::test]
    async fn strict_edges_drop_edge_stops() {
        let store = store_with(edge_store_docs()).await;
        let config = SearchConfig::default().with_edges(EdgePolicy::Strict);
        let search = ProximitySearch::new(&store, &config);

        for strategy in [Strategy::Scan, Strategy::Pushdown] {
            let stops = search.find_nearby(spire(), strategy).await.unwrap();
            assert_eq!(numbers(&stops), vec!["inside"]);
        }
    }

    #[tokio::test]
    async fn legacy_edges_differ_between_strategies() {
        let store = store_with(edge_store_docs()).await;
        let config = SearchConfig::default().with_edges(EdgePolicy::Legacy);
        let search = ProximitySearch::new(&store, &config);

        let scanned = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
        assert_eq!(numbers(&scanned), vec!["inside"]);

        let pushed = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
        assert_eq!(numbers(&pushed), vec!["edge", "inside"]);
    }

    fn short_edge_docs() -> Vec<Document> {
        // Four-decimal text sitting exactly on three edges of the Spire box
        vec![
            stop_doc("lat_min", "53.3418", "-6.2600"),
            stop_doc("lon_max", "53.3500", "-6.2523"),
            stop_doc("lon_min", "53.3500", "-6.2683"),
        ]
    }

    #[tokio::test]
    async fn short_edge_text_follows_edge_policy() {
        let store = store_with(short_edge_docs()).await;
        let all = vec!["lat_min", "lon_max", "lon_min"];
        let none: Vec<&str> = Vec::new();

        for (edges, scan, pushdown) in [
            (EdgePolicy::Inclusive, all.clone(), all.clone()),
            (EdgePolicy::Strict, none.clone(), none.clone()),
            (EdgePolicy::Legacy, none.clone(), all.clone()),
        ] {
            let config = SearchConfig::default().with_edges(edges);
            let search = ProximitySearch::new(&store, &config);

            let scanned = search.find_nearby(spire(), Strategy::Scan).await.unwrap();
            assert_eq!(numbers(&scanned), scan, "{edges:?} scan");

            let pushed = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
            assert_eq!(numbers(&pushed), pushdown, "{edges:?} pushdown");
        }
    }

    #[tokio::test]
    async fn pushdown_falls_back_when_box_crosses_zero() {
        let store = store_with(vec![
            stop_doc("west", "51.477900", "-0.003000"),
            stop_doc("east", "51.477900", "0.003000"),
            stop_doc("far", "51.477900", "0.050000"),
        ])
        .await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let stops = search
            .find_nearby(coord(51.4779, 0.0), Strategy::Pushdown)
            .await
            .unwrap();
        assert_eq!(numbers(&stops), vec!["west", "east"]);
    }

    #[tokio::test]
    async fn pushdown_drops_unparseable_matches() {
        // Sorts inside the latitude range as text but is not a number
        let store = store_with(vec![
            stop_doc("odd", "53.350000abc", "-6.260000"),
            stop_doc("good", "53.350000", "-6.260000"),
        ])
        .await;
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let stops = search.find_nearby(spire(), Strategy::Pushdown).await.unwrap();
        assert_eq!(numbers(&stops), vec!["good"]);
    }

    #[tokio::test]
    async fn store_failure_is_reported() {
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&DownStore, &config);

        assert!(matches!(
            search.find_nearby(spire(), Strategy::Scan).await,
            Err(SearchError::Store(StoreError::Unavailable(_)))
        ));
        assert!(search.find_nearby_or_empty(spire(), Strategy::Pushdown).await.is_empty());
    }

    #[tokio::test]
    async fn stalled_store_times_out() {
        let config = SearchConfig::default().with_store_timeout(0);
        let search = ProximitySearch::new(&StalledStore, &config);

        let result = search.find_nearby(spire(), Strategy::Pushdown).await;
        assert!(matches!(result, Err(SearchError::Timeout)));
    }

    #[test]
    fn search_box_is_quantized() {
        let store = MemoryStore::new();
        let config = SearchConfig::default();
        let search = ProximitySearch::new(&store, &config);

        let bbox = search.search_box(spire());
        assert_eq!(bbox.min_lat(), 53.3418);
        assert_eq!(bbox.max_lat(), 53.3578);
        assert_eq!(bbox.min_lon(), -6.2683);
        assert_eq!(bbox.max_lon(), -6.2523);
    }

    #[test]
    fn strategy_deserializes_lowercase() {
        let s: Strategy = serde_json::from_str(r#""pushdown""#).unwrap();
        assert_eq!(s, Strategy::Pushdown);
        assert_eq!(Strategy::default(), Strategy::Scan);
    }

    #[test]
    fn timeout_is_configurable() {
        let config = SearchConfig::default().with_store_timeout(2);
        assert_eq!(config.store_timeout(), Duration::from_secs(2));
    }
}
