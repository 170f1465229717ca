//! Web layer for the journey planner.
//!
//! Provides HTTP endpoints for readiness and journey planning.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::{AppState, StationNames};
