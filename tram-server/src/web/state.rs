//! Application state for the web layer.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::StationId;
use crate::health::HealthRegistry;
use crate::planner::RouteSearchEngine;
use crate::timetable::Timetable;

/// Display names of stations, by id.
#[derive(Debug, Clone, Default)]
pub struct StationNames(HashMap<StationId, String>);

impl StationNames {
    pub fn from_timetable(timetable: &Timetable) -> Self {
        Self(
            timetable
                .stations
                .iter()
                .map(|s| (s.id.clone(), s.name.clone()))
                .collect(),
        )
    }

    /// The station's name, or its id if it has none.
    pub fn name_of<'a>(&'a self, station: &'a StationId) -> &'a str {
        self.0
            .get(station)
            .map_or_else(|| station.as_str(), String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Shared application state.
///
/// Contains all the services needed to handle requests.
#[derive(Clone)]
pub struct AppState {
    /// Journey planner over the loaded graph
    pub engine: Arc<RouteSearchEngine>,

    /// Readiness checks behind `/health`
    pub health: Arc<HealthRegistry>,

    pub names: Arc<StationNames>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(engine: RouteSearchEngine, health: HealthRegistry, names: StationNames) -> Self {
        Self {
            engine: Arc::new(engine),
            health: Arc::new(health),
            names: Arc::new(names),
        }
    }
}
