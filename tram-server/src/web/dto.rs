//! Data transfer objects for web requests and responses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{ChangeStage, Journey, RideStage, Stage, StationId, TimePoint, TransportMode, WalkStage};
use crate::planner::{JourneyRequest, Location, SearchResult};

use super::state::StationNames;

/// Request to plan a journey.
#[derive(Debug, Deserialize)]
pub struct PlanJourneyRequest {
    /// e.g. `{"station": "A"}` or `{"composite": "C"}`
    pub origin: Location,

    pub destination: Location,

    /// Travel date, `YYYY-MM-DD`
    pub date: NaiveDate,

    /// Earliest departure times, `HH:MM`. Each is searched separately.
    pub times: Vec<TimePoint>,

    #[serde(default)]
    pub max_changes: Option<usize>,

    #[serde(default)]
    pub max_journey_mins: Option<u32>,

    #[serde(default)]
    pub max_results: Option<usize>,
}

impl From<PlanJourneyRequest> for JourneyRequest {
    fn from(req: PlanJourneyRequest) -> Self {
        JourneyRequest {
            origins: vec![req.origin],
            destinations: vec![req.destination],
            date: req.date,
            query_times: req.times,
            max_changes: req.max_changes,
            max_journey_mins: req.max_journey_mins,
            max_results: req.max_results,
        }
    }
}

/// Response for journey planning.
#[derive(Debug, Serialize)]
pub struct PlanJourneyResponse {
    /// Found journey options, best first
    pub journeys: Vec<JourneyResult>,

    /// Number of search states explored
    pub states_explored: usize,

    /// Whether the search stopped early
    pub truncated: bool,
}

impl PlanJourneyResponse {
    pub fn from_result(result: &SearchResult, names: &StationNames) -> Self {
        Self {
            journeys: result
                .journeys
                .iter()
                .map(|j| JourneyResult::from_journey(j, names))
                .collect(),
            states_explored: result.states_explored,
            truncated: result.truncated,
        }
    }
}

/// A journey option.
#[derive(Debug, Serialize)]
pub struct JourneyResult {
    pub stages: Vec<StageResult>,

    /// Departure time from origin
    pub departure_time: String,

    /// Arrival time at destination
    pub arrival_time: String,

    /// Total duration in minutes
    pub duration_mins: u32,

    /// Number of changes
    pub changes: usize,
}

/// A stage of a journey.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StageResult {
    Ride(RideResult),
    Change(ChangeResult),
    Walk(WalkResult),
}

/// A ride on one vehicle.
#[derive(Debug, Serialize)]
pub struct RideResult {
    pub mode: TransportMode,

    pub route: String,

    pub trip: String,

    /// Boarding station, with departure time
    pub from: StationInfo,

    /// Alighting station, with arrival time
    pub to: StationInfo,

    /// Stops passed between the two
    pub stops: Vec<StationInfo>,

    pub platform: Option<String>,
}

/// Waiting at a station between rides.
#[derive(Debug, Serialize)]
pub struct ChangeResult {
    pub station: StationInfo,

    pub wait_mins: u32,
}

/// A walking stage.
#[derive(Debug, Serialize)]
pub struct WalkResult {
    /// From station, with departure time
    pub from: StationInfo,

    /// To station, with arrival time
    pub to: StationInfo,

    /// Duration in minutes
    pub duration_mins: u32,
}

/// Station information for display.
#[derive(Debug, Serialize)]
pub struct StationInfo {
    pub id: String,

    pub name: String,

    /// Time at this station
    pub time: Option<String>,
}

impl StationInfo {
    fn new(station: &StationId, time: Option<TimePoint>, names: &StationNames) -> Self {
        Self {
            id: station.to_string(),
            name: names.name_of(station).to_string(),
            time: time.map(|t| t.to_string()),
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

impl JourneyResult {
    /// Create from a domain Journey.
    pub fn from_journey(journey: &Journey, names: &StationNames) -> Self {
        let stages = journey
            .stages()
            .iter()
            .map(|stage| match stage {
                Stage::Ride(ride) => StageResult::Ride(RideResult::from_ride(ride, names)),
                Stage::Change(change) => StageResult::Change(ChangeResult::from_change(change, names)),
                Stage::Walk(walk) => StageResult::Walk(WalkResult::from_walk(walk, names)),
            })
            .collect();

        Self {
            stages,
            departure_time: journey.departure_time().to_string(),
            arrival_time: journey.arrival_time().to_string(),
            duration_mins: journey.duration_minutes(),
            changes: journey.change_count(),
        }
    }
}

impl RideResult {
    pub fn from_ride(ride: &RideStage, names: &StationNames) -> Self {
        Self {
            mode: ride.mode,
            route: ride.route.to_string(),
            trip: ride.trip.to_string(),
            from: StationInfo::new(&ride.from, Some(ride.departure), names),
            to: StationInfo::new(&ride.to, Some(ride.arrival), names),
            stops: ride
                .calling_points
                .iter()
                .map(|s| StationInfo::new(s, None, names))
                .collect(),
            platform: ride.platform.as_ref().map(|p| p.to_string()),
        }
    }
}

impl ChangeResult {
    pub fn from_change(change: &ChangeStage, names: &StationNames) -> Self {
        Self {
            station: StationInfo::new(&change.station, Some(change.arrive), names),
            wait_mins: change.wait_minutes(),
        }
    }
}

impl WalkResult {
    pub fn from_walk(walk: &WalkStage, names: &StationNames) -> Self {
        Self {
            from: StationInfo::new(&walk.from, Some(walk.departure), names),
            to: StationInfo::new(&walk.to, Some(walk.arrival), names),
            duration_mins: walk.cost,
        }
    }
}
