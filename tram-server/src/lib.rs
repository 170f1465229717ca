//! Tram and bus journey planner server.
//!
//! Builds a time-expanded graph from a timetable feed, links nearby stops of
//! different modes with walks, and answers: "leaving here at this time, how
//! do I get there?"

pub mod bitmap;
pub mod cache;
pub mod domain;
pub mod graph;
pub mod health;
pub mod neighbours;
pub mod planner;
pub mod settings;
pub mod spatial;
pub mod timetable;
pub mod web;

#[cfg(test)]
mod testing;
