//! Journey requests.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{CompositeId, StationId, TimePoint};

use super::config::SearchConfig;
use super::search::SearchError;

/// Where a journey starts or ends: one station, or every member of a
/// composite station.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Station(StationId),
    Composite(CompositeId),
}

impl Location {
    pub fn station(id: &str) -> Self {
        Location::Station(StationId::new(id))
    }

    pub fn composite(id: &str) -> Self {
        Location::Composite(CompositeId::new(id))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Station(id) => write!(f, "station {id}"),
            Location::Composite(id) => write!(f, "composite {id}"),
        }
    }
}

/// Request for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JourneyRequest {
    pub origins: Vec<Location>,
    pub destinations: Vec<Location>,
    pub date: NaiveDate,
    /// Earliest departure times; each is searched separately.
    pub query_times: Vec<TimePoint>,
    pub max_changes: Option<usize>,
    pub max_journey_mins: Option<u32>,
    pub max_results: Option<usize>,
}

/// Limits for one request after applying the engine's configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    pub max_changes: usize,
    pub max_journey_mins: u32,
    pub max_results: usize,
}

impl JourneyRequest {
    /// A request from one place to another, leaving no earlier than
    /// `query_time`.
    pub fn new(origin: Location, destination: Location, date: NaiveDate, query_time: TimePoint) -> Self {
        Self {
            origins: vec![origin],
            destinations: vec![destination],
            date,
            query_times: vec![query_time],
            max_changes: None,
            max_journey_mins: None,
            max_results: None,
        }
    }

    pub fn with_query_time(mut self, query_time: TimePoint) -> Self {
        self.query_times.push(query_time);
        self
    }

    pub fn with_max_changes(mut self, max_changes: usize) -> Self {
        self.max_changes = Some(max_changes);
        self
    }

    pub fn with_max_journey_mins(mut self, minutes: u32) -> Self {
        self.max_journey_mins = Some(minutes);
        self
    }

    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = Some(max_results);
        self
    }

    /// Validate the search request.
    ///
    /// Only checks the request on its own; the engine checks stations and
    /// dates against the graph.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.origins.is_empty() {
            return Err(SearchError::InvalidRequest("no origin given".to_string()));
        }
        if self.destinations.is_empty() {
            return Err(SearchError::InvalidRequest(
                "no destination given".to_string(),
            ));
        }
        if self.query_times.is_empty() {
            return Err(SearchError::InvalidRequest(
                "no query time given".to_string(),
            ));
        }
        if self.max_results == Some(0) {
            return Err(SearchError::InvalidRequest(
                "max_results must be at least one".to_string(),
            ));
        }
        if self.max_journey_mins == Some(0) {
            return Err(SearchError::InvalidRequest(
                "max_journey_mins must be at least one".to_string(),
            ));
        }
        if let Some(same) = self.origins.iter().find(|o| self.destinations.contains(o)) {
            return Err(SearchError::InvalidRequest(format!(
                "{same} is both origin and destination"
            )));
        }
        Ok(())
    }

    /// Request limits, never looser than the engine's configuration.
    pub(crate) fn limits(&self, config: &SearchConfig) -> Limits {
        Limits {
            max_changes: self
                .max_changes
                .unwrap_or(config.max_changes)
                .min(config.max_changes),
            max_journey_mins: self
                .max_journey_mins
                .unwrap_or(config.max_journey_mins)
                .min(config.max_journey_mins),
            max_results: self
                .max_results
                .unwrap_or(config.max_results)
                .min(config.max_results),
        }
    }
}
