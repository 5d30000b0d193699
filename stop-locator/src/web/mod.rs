//! Web layer for the stop locator.
//!
//! Provides HTTP endpoints for finding stops near a place or a position.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
