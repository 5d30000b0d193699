//! Domain types for stop location.
//!
//! Coordinates, bounding boxes, stop records and queries. All types enforce
//! their invariants at construction time, so code that receives them can
//! trust their validity.

mod bounds;
mod coordinate;
mod query;
mod stop;

pub use bounds::{BOUND_PRECISION, BoundingBox, Edge, bound_text};
pub use coordinate::{Coordinate, InvalidCoordinate};
pub use query::{InvalidQuery, SearchQuery};
pub use stop::{ResolvedStop, StopRecord};
