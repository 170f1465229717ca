//! Domain error types.
//!
//! These errors represent failures building journeys out of stages. They
//! are distinct from graph and request errors.

use super::{StationId, TimeError};

/// Domain-level errors for journey construction.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DomainError {
    /// Journey has no stages
    #[error("journey must have at least one stage")]
    EmptyJourney,

    /// Consecutive stages don't meet at the same station
    #[error("stages do not connect: {0} then {1}")]
    StationsNotConnected(StationId, StationId),

    /// A stage departs before the previous one arrives
    #[error("stage at {0} goes back in time")]
    TimeTravel(StationId),

    #[error(transparent)]
    Time(#[from] TimeError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TimePoint;

    #[test]
    fn error_display() {
        let err = DomainError::EmptyJourney;
        assert_eq!(err.to_string(), "journey must have at least one stage");

        let err = DomainError::StationsNotConnected(StationId::new("A"), StationId::new("B"));
        assert_eq!(err.to_string(), "stages do not connect: A then B");

        let err = DomainError::TimeTravel(StationId::new("C"));
        assert_eq!(err.to_string(), "stage at C goes back in time");

        let time_err = TimePoint::MIDNIGHT.minus_minutes(1).unwrap_err();
        let err = DomainError::from(time_err);
        assert_eq!(err.to_string(), "invalid time: before start of service day");
    }
}
