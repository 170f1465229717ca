//! Search configuration for the journey planner.

use chrono::Duration;

/// Limits and defaults for journey search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum number of changes between vehicles. Requests may ask for
    /// fewer, never more.
    pub max_changes: usize,

    /// Maximum number of journeys to return.
    pub max_results: usize,

    /// Maximum total journey time (minutes), first departure to arrival.
    pub max_journey_mins: u32,

    /// Longest single walk between neighbouring stations (minutes).
    pub max_walk_mins: u32,

    /// Longest wait for a departure, at the origin or when changing
    /// (minutes).
    pub max_wait_mins: u32,

    /// Origin and destination closer than this are offered as a walk.
    pub direct_walk_margin_metres: u32,

    pub walk_speed_m_per_min: u32,

    /// States expanded per query time before the search gives up.
    pub max_states: usize,

    /// Wall-clock budget per query time (milliseconds).
    pub time_budget_ms: u64,
}

impl SearchConfig {
    /// Create a new configuration with the given limits; the remaining
    /// fields take their defaults.
    pub fn new(
        max_changes: usize,
        max_results: usize,
        max_journey_mins: u32,
        max_walk_mins: u32,
        max_wait_mins: u32,
    ) -> Self {
        Self {
            max_changes,
            max_results,
            max_journey_mins,
            max_walk_mins,
            max_wait_mins,
            ..Self::default()
        }
    }

    /// Returns the maximum journey time as a Duration.
    pub fn max_journey(&self) -> Duration {
        Duration::minutes(i64::from(self.max_journey_mins))
    }

    /// Returns the maximum walk time as a Duration.
    pub fn max_walk(&self) -> Duration {
        Duration::minutes(i64::from(self.max_walk_mins))
    }

    /// Returns the maximum wait as a Duration.
    pub fn max_wait(&self) -> Duration {
        Duration::minutes(i64::from(self.max_wait_mins))
    }

    pub fn time_budget(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.time_budget_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_changes: 3,
            max_results: 5,
            max_journey_mins: 120,
            max_walk_mins: 15,
            max_wait_mins: 60,
            direct_walk_margin_metres: 1000,
            walk_speed_m_per_min: 80,
            max_states: 250_000,
            time_budget_ms: 5_000,
        }
    }
}
