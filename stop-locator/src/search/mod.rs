//! Proximity search for stops.
//!
//! This module answers "which stops are within about half a mile of this
//! point" against a [`DocumentStore`](crate::store::DocumentStore) whose
//! stop coordinates are stored as text.

mod config;
mod engine;
mod predicate;

pub use config::{EdgePolicy, Ranking, SearchConfig};
pub use engine::{ProximitySearch, SearchError, Strategy};
pub use predicate::range_filter;
