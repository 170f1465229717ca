//! Journey planning over the transit graph.
//!
//! Answers: "leaving here at this time, how do I get there?" A search
//! resolves the request's locations to stations, builds (or reuses) the
//! set of services running on the date, and runs a best-first traversal
//! per query time. Results from every query time are merged, deduplicated
//! and ranked.

mod config;
mod connectivity;
mod day;
mod rank;
mod request;
mod search;

pub use config::SearchConfig;
pub use connectivity::RouteConnectivity;
pub use day::DayContext;
pub use rank::{deduplicate, rank_journeys};
pub use request::{JourneyRequest, Location};
pub use search::{RouteSearchEngine, SearchError, SearchResult};
