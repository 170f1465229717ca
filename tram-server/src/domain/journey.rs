//! Journey types.
//!
//! A `Journey` is a complete itinerary from origin to destination made of
//! typed stages: rides on a single trip, changes at a station and walks
//! between nearby stations.

use serde::Serialize;

use super::{DomainError, PlatformId, RouteId, StationId, TimePoint, TransportMode, TripId};

/// Board a trip at one station and ride it to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RideStage {
    pub mode: TransportMode,
    pub route: RouteId,
    pub trip: TripId,
    /// Boarding station
    pub from: StationId,
    /// Alighting station
    pub to: StationId,
    /// Boarding platform, when the stop has them
    pub platform: Option<PlatformId>,
    pub departure: TimePoint,
    pub arrival: TimePoint,
    /// Stations passed between boarding and alighting.
    pub calling_points: Vec<StationId>,
}

impl RideStage {
    pub fn cost_minutes(&self) -> u32 {
        TimePoint::diff_minutes(self.departure, self.arrival)
    }
}

/// Wait at a station between two rides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeStage {
    pub station: StationId,
    pub arrive: TimePoint,
    pub depart: TimePoint,
}

impl ChangeStage {
    pub fn wait_minutes(&self) -> u32 {
        TimePoint::diff_minutes(self.arrive, self.depart)
    }
}

/// Walk between two stations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WalkStage {
    pub from: StationId,
    pub to: StationId,
    pub departure: TimePoint,
    pub arrival: TimePoint,
    pub cost: u32,
}

impl WalkStage {
    /// Creates a walk leaving at `departure` and taking `cost` minutes.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the arrival falls past the end of the following day.
    pub fn new(
        from: StationId,
        to: StationId,
        departure: TimePoint,
        cost: u32,
    ) -> Result<Self, DomainError> {
        let arrival = departure.plus_minutes(cost)?;
        Ok(Self {
            from,
            to,
            departure,
            arrival,
            cost,
        })
    }
}

/// One part of a journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Stage {
    Ride(RideStage),
    Change(ChangeStage),
    Walk(WalkStage),
}

impl Stage {
    /// Returns the station this stage starts at.
    pub fn origin(&self) -> &StationId {
        match self {
            Stage::Ride(ride) => &ride.from,
            Stage::Change(change) => &change.station,
            Stage::Walk(walk) => &walk.from,
        }
    }

    /// Returns the station this stage ends at.
    pub fn destination(&self) -> &StationId {
        match self {
            Stage::Ride(ride) => &ride.to,
            Stage::Change(change) => &change.station,
            Stage::Walk(walk) => &walk.to,
        }
    }

    pub fn departure(&self) -> TimePoint {
        match self {
            Stage::Ride(ride) => ride.departure,
            Stage::Change(change) => change.arrive,
            Stage::Walk(walk) => walk.departure,
        }
    }

    pub fn arrival(&self) -> TimePoint {
        match self {
            Stage::Ride(ride) => ride.arrival,
            Stage::Change(change) => change.depart,
            Stage::Walk(walk) => walk.arrival,
        }
    }

    /// Minutes spent in this stage.
    pub fn cost_minutes(&self) -> u32 {
        TimePoint::diff_minutes(self.departure(), self.arrival())
    }

    pub fn as_ride(&self) -> Option<&RideStage> {
        match self {
            Stage::Ride(ride) => Some(ride),
            _ => None,
        }
    }

    pub fn is_walk(&self) -> bool {
        matches!(self, Stage::Walk(_))
    }

    fn key(&self) -> StageKey {
        match self {
            Stage::Ride(ride) => StageKey::Ride {
                trip: ride.trip.clone(),
                from: ride.from.clone(),
                to: ride.to.clone(),
                departure: ride.departure,
            },
            Stage::Change(change) => StageKey::Change {
                station: change.station.clone(),
            },
            Stage::Walk(walk) => StageKey::Walk {
                from: walk.from.clone(),
                to: walk.to.clone(),
                departure: walk.departure,
            },
        }
    }
}

/// Identity of a stage for de-duplication. Waiting times are deliberately
/// left out: two journeys on the same trips between the same stations are
/// the same itinerary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum StageKey {
    Ride {
        trip: TripId,
        from: StationId,
        to: StationId,
        departure: TimePoint,
    },
    Change {
        station: StationId,
    },
    Walk {
        from: StationId,
        to: StationId,
        departure: TimePoint,
    },
}

/// De-duplication key for a journey.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JourneySignature(Vec<StageKey>);

/// A complete journey from origin to destination.
///
/// # Invariants
///
/// - At least one stage
/// - Consecutive stages connect (destination of one = origin of next)
/// - Stage times never go backwards
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Journey {
    stages: Vec<Stage>,
    query_time: TimePoint,
}

impl Journey {
    /// Constructs a journey from stages found for a search starting at
    /// `query_time`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - Stages list is empty
    /// - Stages don't connect (destination != next origin)
    /// - A stage departs before the previous one arrives
    pub fn new(stages: Vec<Stage>, query_time: TimePoint) -> Result<Self, DomainError> {
        if stages.is_empty() {
            return Err(DomainError::EmptyJourney);
        }

        for stage in &stages {
            if stage.arrival() < stage.departure() {
                return Err(DomainError::TimeTravel(stage.origin().clone()));
            }
        }

        for window in stages.windows(2) {
            let prev_dest = window[0].destination();
            let next_origin = window[1].origin();
            if prev_dest != next_origin {
                return Err(DomainError::StationsNotConnected(
                    prev_dest.clone(),
                    next_origin.clone(),
                ));
            }
            if window[1].departure() < window[0].arrival() {
                return Err(DomainError::TimeTravel(next_origin.clone()));
            }
        }

        Ok(Journey { stages, query_time })
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// The query time this journey was found for.
    pub fn query_time(&self) -> TimePoint {
        self.query_time
    }

    /// Returns all rides in order.
    pub fn rides(&self) -> impl Iterator<Item = &RideStage> {
        self.stages.iter().filter_map(Stage::as_ride)
    }

    pub fn ride_count(&self) -> usize {
        self.rides().count()
    }

    /// Returns the number of changes (rides - 1, or 0 for direct).
    pub fn change_count(&self) -> usize {
        self.ride_count().saturating_sub(1)
    }

    pub fn origin(&self) -> &StationId {
        self.stages[0].origin()
    }

    pub fn destination(&self) -> &StationId {
        self.stages[self.stages.len() - 1].destination()
    }

    pub fn departure_time(&self) -> TimePoint {
        self.stages[0].departure()
    }

    pub fn arrival_time(&self) -> TimePoint {
        self.stages[self.stages.len() - 1].arrival()
    }

    pub fn duration_minutes(&self) -> u32 {
        TimePoint::diff_minutes(self.departure_time(), self.arrival_time())
    }

    /// Total minutes spent walking.
    pub fn walk_minutes(&self) -> u32 {
        self.stages
            .iter()
            .filter(|s| s.is_walk())
            .map(Stage::cost_minutes)
            .sum()
    }

    /// True if the journey never boards a vehicle.
    pub fn is_all_walk(&self) -> bool {
        self.stages.iter().all(Stage::is_walk)
    }

    pub fn departs_before_query(&self) -> bool {
        self.departure_time() < self.query_time
    }

    pub fn signature(&self) -> JourneySignature {
        JourneySignature(self.stages.iter().map(Stage::key).collect())
    }
}
