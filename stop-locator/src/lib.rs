//! Bus stop locator.
//!
//! Resolves a free-text place or a `lat,lng` pair to a position inside a
//! service region, then finds the stops within about half a mile of it.

pub mod cache;
pub mod domain;
pub mod geocoder;
pub mod locate;
pub mod search;
pub mod store;
pub mod web;
