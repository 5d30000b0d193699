//! Search configuration for proximity search.

use std::time::Duration;

use serde::Deserialize;

use crate::domain::Edge;

/// How the scan strategy chooses which matches to keep once it has enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ranking {
    /// Keep the first `scan_limit` matches in store order and stop reading.
    #[default]
    Encounter,
    /// Read every match, keep the `scan_limit` closest to the center.
    Nearest,
}

/// Which comparisons each strategy uses at the edges of the search box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Both strategies include stops on the edge.
    #[default]
    Inclusive,
    /// Both strategies exclude stops on the edge.
    Strict,
    /// Scan excludes edge stops, pushdown includes them.
    Legacy,
}

impl EdgePolicy {
    pub fn scan_edge(self) -> Edge {
        match self {
            EdgePolicy::Inclusive => Edge::Inclusive,
            EdgePolicy::Strict | EdgePolicy::Legacy => Edge::Exclusive,
        }
    }

    pub fn pushdown_edge(self) -> Edge {
        match self {
            EdgePolicy::Inclusive | EdgePolicy::Legacy => Edge::Inclusive,
            EdgePolicy::Strict => Edge::Exclusive,
        }
    }
}

/// Configuration parameters for proximity search.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Half-width of the search box in degrees, applied to both axes.
    /// 0.008 is roughly half a mile at Dublin's latitude.
    pub margin_degrees: f64,

    /// Maximum number of stops the scan strategy returns.
    pub scan_limit: usize,

    /// Which matches the scan keeps.
    pub ranking: Ranking,

    /// Edge handling for both strategies.
    pub edges: EdgePolicy,

    /// Upper bound on a store query, including reading its cursor (seconds).
    pub store_timeout_secs: u64,

    /// Collection holding stop documents.
    pub collection: String,
}

impl SearchConfig {
    /// Set the search box margin.
    pub fn with_margin(mut self, degrees: f64) -> Self {
        self.margin_degrees = degrees;
        self
    }

    /// Set the scan result limit.
    pub fn with_scan_limit(mut self, limit: usize) -> Self {
        self.scan_limit = limit;
        self
    }

    pub fn with_ranking(mut self, ranking: Ranking) -> Self {
        self.ranking = ranking;
        self
    }

    pub fn with_edges(mut self, edges: EdgePolicy) -> Self {
        self.edges = edges;
        self
    }

    /// Set the store timeout.
    pub fn with_store_timeout(mut self, secs: u64) -> Self {
        self.store_timeout_secs = secs;
        self
    }

    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Returns the store timeout as a Duration.
    pub fn store_timeout(&self) -> Duration {
        Duration::from_secs(self.store_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            margin_degrees: 0.008,
            scan_limit: 5,
            ranking: Ranking::Encounter,
            edges: EdgePolicy::Inclusive,
            store_timeout_secs: 60,
            collection: "stops".to_string(),
        }
    }
}
