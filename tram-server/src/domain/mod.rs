//! Domain types for the tram and bus journey planner.
//!
//! This module contains the validated timetable records the graph is built
//! from and the journey types the planner returns.

mod calendar;
mod error;
mod ids;
mod journey;
mod station;
mod time;
mod trip;

pub use calendar::{DaysOfWeek, ServiceCalendar};
pub use error::DomainError;
pub use ids::{AgencyId, CompositeId, PlatformId, RouteId, ServiceId, StationId, TripId};
pub use journey::{ChangeStage, Journey, JourneySignature, RideStage, Stage, WalkStage};
pub use station::{CompositeStation, LatLong, Modes, Platform, Station, TransportMode};
pub use time::{HOUR_BUCKETS, MINUTES_PER_DAY, TimeError, TimePoint};
pub use trip::{Agency, Direction, FeedInfo, Route, Service, StopCall, Trip};
