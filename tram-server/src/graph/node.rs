//! Node and relationship types of the transit graph.

use serde::{Deserialize, Serialize};

use crate::domain::{
    CompositeId, DaysOfWeek, PlatformId, RouteId, ServiceId, StationId, TimePoint, TransportMode,
    TripId,
};

/// Dense index of a node in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Dense index of a relationship in its graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipId(pub(crate) u32);

impl RelationshipId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "label", rename_all = "snake_case")]
pub enum Node {
    Station {
        station: StationId,
    },
    Platform {
        platform: PlatformId,
        station: StationId,
    },
    /// A route calling at a station.
    RouteStation {
        route: RouteId,
        station: StationId,
        mode: TransportMode,
    },
    /// One service of a route at a route station.
    Service {
        route_station: NodeId,
        service: ServiceId,
    },
    /// Departures of a service within one hour bucket.
    Hour {
        service_node: NodeId,
        hour: u8,
    },
    /// One scheduled departure of a trip.
    Minute {
        hour_node: NodeId,
        time: TimePoint,
        trip: TripId,
    },
    Composite {
        composite: CompositeId,
    },
}

impl Node {
    /// The station this node belongs to, if any.
    pub fn station(&self) -> Option<&StationId> {
        match self {
            Node::Station { station }
            | Node::Platform { station, .. }
            | Node::RouteStation { station, .. } => Some(station),
            Node::Service { .. } | Node::Hour { .. } | Node::Minute { .. } | Node::Composite { .. } => {
                None
            }
        }
    }
}

/// Typed relationship between two nodes. Costs are in minutes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Relationship {
    /// Station or platform to route station.
    Board { cost: u32 },
    InterchangeBoard { cost: u32 },
    /// Route station to station or platform.
    Depart { cost: u32 },
    InterchangeDepart { cost: u32 },
    EnterPlatform { cost: u32 },
    LeavePlatform { cost: u32 },
    ToService {
        service: ServiceId,
        days_running: DaysOfWeek,
    },
    ToHour { hour: u8 },
    ToMinute {
        /// Dwell at the stop before departure.
        cost: u32,
        days_running: DaysOfWeek,
        times_running: Vec<TimePoint>,
        trip: TripId,
        /// Passengers may board this departure.
        pickup: bool,
    },
    /// Minute node to the next route station on the trip.
    OnRoute {
        route: RouteId,
        trip: TripId,
        cost: u32,
        /// Passengers may alight at the far end.
        dropoff: bool,
    },
    /// Walk between stations of different modes.
    Neighbour { cost: u32 },
    /// Composite station to one of its members, or back.
    Grouped,
}

impl Relationship {
    /// Fixed cost of traversing the relationship, where it has one.
    pub fn cost(&self) -> u32 {
        match self {
            Relationship::Board { cost }
            | Relationship::InterchangeBoard { cost }
            | Relationship::Depart { cost }
            | Relationship::InterchangeDepart { cost }
            | Relationship::EnterPlatform { cost }
            | Relationship::LeavePlatform { cost }
            | Relationship::ToMinute { cost, .. }
            | Relationship::OnRoute { cost, .. }
            | Relationship::Neighbour { cost } => *cost,
            Relationship::ToService { .. } | Relationship::ToHour { .. } | Relationship::Grouped => 0,
        }
    }

    pub fn is_boarding(&self) -> bool {
        matches!(
            self,
            Relationship::Board { .. } | Relationship::InterchangeBoard { .. }
        )
    }

    pub fn is_departing(&self) -> bool {
        matches!(
            self,
            Relationship::Depart { .. } | Relationship::InterchangeDepart { .. }
        )
    }
}

/// A relationship with its end points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
    pub relationship: Relationship,
}
