//! Inbound search queries.

use super::coordinate::{Coordinate, InvalidCoordinate};

/// What the caller is searching near: free text or an explicit position.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchQuery {
    /// An address, landmark or keyword to geocode.
    Text(String),
    /// A position the caller already has.
    Coordinates(Coordinate),
}

/// Error returned for a query that cannot be searched.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidQuery {
    #[error("query text must not be empty")]
    Empty,

    #[error(transparent)]
    Coordinate(#[from] InvalidCoordinate),
}

impl SearchQuery {
    /// A text query. Blank text is rejected.
    pub fn text(s: impl Into<String>) -> Result<Self, InvalidQuery> {
        let s = s.into();
        if s.trim().is_empty() {
            return Err(InvalidQuery::Empty);
        }
        Ok(SearchQuery::Text(s))
    }

    /// A coordinate query from a `lat,lng` pair.
    pub fn coordinates(s: &str) -> Result<Self, InvalidQuery> {
        Ok(SearchQuery::Coordinates(Coordinate::parse_pair(s)?))
    }

    /// Interpret user input: a valid `lat,lng` pair becomes a coordinate
    /// query, anything else is geocoded as text.
    pub fn infer(s: &str) -> Result<Self, InvalidQuery> {
        match Coordinate::parse_pair(s) {
            Ok(c) => Ok(SearchQuery::Coordinates(c)),
            Err(_) => Self::text(s),
        }
    }
}
