//! Web layer for the availability search server.
//!
//! Provides HTTP endpoints for ranked hospital search, per-hospital
//! doctor listings, and autocomplete.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
