//! Routes, services, trips and their stop calls.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{
    AgencyId, PlatformId, RouteId, ServiceCalendar, ServiceId, StationId, TimePoint,
    TransportMode, TripId,
};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agency {
    pub id: AgencyId,
    pub name: String,
}

/// Direction of travel along a route, as published.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outbound,
    Inbound,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub id: RouteId,
    pub short_name: String,
    #[serde(default)]
    pub long_name: String,
    pub agency: AgencyId,
    pub mode: TransportMode,
    #[serde(default)]
    pub direction: Direction,
}

/// A set of trips sharing one calendar.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Service {
    pub id: ServiceId,
    pub calendar: ServiceCalendar,
}

/// A scheduled visit of a trip to a station.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopCall {
    pub station: StationId,
    #[serde(default)]
    pub platform: Option<PlatformId>,
    pub arrival: TimePoint,
    pub departure: TimePoint,
    /// Passengers may board here.
    #[serde(default = "yes")]
    pub pickup: bool,
    /// Passengers may alight here.
    #[serde(default = "yes")]
    pub dropoff: bool,
    pub sequence: u32,
}

fn yes() -> bool {
    true
}

impl StopCall {
    /// A call that both picks up and drops off.
    pub fn new(station: impl Into<StationId>, arrival: TimePoint, departure: TimePoint, sequence: u32) -> Self {
        Self {
            station: station.into(),
            platform: None,
            arrival,
            departure,
            pickup: true,
            dropoff: true,
            sequence,
        }
    }

    pub fn at_platform(mut self, platform: impl Into<PlatformId>) -> Self {
        self.platform = Some(platform.into());
        self
    }

    /// Minutes spent at the stop.
    pub fn dwell_minutes(&self) -> u32 {
        TimePoint::diff_minutes(self.arrival, self.departure)
    }
}

/// One run of a vehicle along a route.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trip {
    pub id: TripId,
    pub service: ServiceId,
    pub route: RouteId,
    #[serde(default)]
    pub headsign: String,
    pub calls: Vec<StopCall>,
}

impl Trip {
    /// Check stop calls are usable: at least two, sequence strictly increasing,
    /// and times never going backwards.
    pub fn validate_calls(&self) -> Result<(), &'static str> {
        if self.calls.len() < 2 {
            return Err("fewer than two stop calls");
        }
        for call in &self.calls {
            if call.departure < call.arrival {
                return Err("departure before arrival");
            }
        }
        for pair in self.calls.windows(2) {
            if pair[1].sequence <= pair[0].sequence {
                return Err("stop sequence not increasing");
            }
            if pair[1].arrival < pair[0].departure {
                return Err("stop calls not in chronological order");
            }
        }
        Ok(())
    }

    pub fn first_departure(&self) -> Option<TimePoint> {
        self.calls.first().map(|c| c.departure)
    }

    pub fn last_arrival(&self) -> Option<TimePoint> {
        self.calls.last().map(|c| c.arrival)
    }
}

/// Version and validity of the published feed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedInfo {
    pub version: String,
    pub valid_from: NaiveDate,
    pub valid_until: NaiveDate,
}

impl FeedInfo {
    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.valid_from && date <= self.valid_until
    }
}
