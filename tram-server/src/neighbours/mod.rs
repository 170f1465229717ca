//! Walking links between nearby stations.
//!
//! Stops of different modes that are close together (a tram stop across
//! the road from a bus stop, say) are linked with a walk in both
//! directions, and both become interchanges.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::StationId;
use crate::graph::Graph;
use crate::spatial::StationLocations;
use crate::timetable::Timetable;

/// How far, and how fast, people are assumed to walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NeighbourConfig {
    pub margin_metres: u32,
    pub walk_speed_m_per_min: u32,
}

impl Default for NeighbourConfig {
    fn default() -> Self {
        Self {
            margin_metres: 1000,
            walk_speed_m_per_min: 80,
        }
    }
}

impl NeighbourConfig {
    pub fn new(margin_metres: u32, walk_speed_m_per_min: u32) -> Self {
        Self {
            margin_metres,
            walk_speed_m_per_min,
        }
    }

    /// Whole minutes to walk `distance_metres`, never less than one.
    pub fn walk_minutes(&self, distance_metres: u32) -> u32 {
        walk_minutes(distance_metres, self.walk_speed_m_per_min)
    }
}

/// Whole minutes to walk `distance_metres` at `speed` metres per minute,
/// rounded up and never less than one.
pub fn walk_minutes(distance_metres: u32, speed: u32) -> u32 {
    distance_metres.div_ceil(speed.max(1)).max(1)
}

pub struct NeighbourLinker {
    config: NeighbourConfig,
}

impl NeighbourLinker {
    pub fn new(config: NeighbourConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NeighbourConfig {
        &self.config
    }

    /// Link every pair of stations of different modes within the margin.
    ///
    /// Safe to run again on the same graph: existing links are left alone.
    /// Returns the number of pairs added.
    pub fn create_neighbours(
        &self,
        graph: &mut Graph,
        locations: &StationLocations,
        timetable: &Timetable,
    ) -> usize {
        let stations: Vec<StationId> = graph.stations().cloned().collect();

        let mut added = 0;
        for station in &stations {
            let Some(position) = locations.position_of(station) else {
                debug!(station = %station, "station has no location, not linked");
                continue;
            };
            let modes = timetable.effective_modes(station);

            // Every stop inside the margin, however many there are
            for candidate in locations.stations_within(position, self.config.margin_metres) {
                if &candidate.id == station {
                    continue;
                }
                if timetable.effective_modes(&candidate.id) == modes {
                    continue;
                }
                let cost = self.config.walk_minutes(candidate.distance_metres);
                if graph.add_neighbour(station, &candidate.id, cost) {
                    debug!(from = %station, to = %candidate.id, cost, "linked neighbours");
                    added += 1;
                }
                graph.mark_interchange(station);
                graph.mark_interchange(&candidate.id);
            }
        }

        info!(
            added,
            total = graph.neighbour_pair_count(),
            margin_metres = self.config.margin_metres,
            "linked neighbouring stations"
        );
        added
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    use crate::domain::{Station, TransportMode};
    use crate::graph::{GraphBuilder, GraphConfig};
    use crate::testing;

    fn layout() -> impl Strategy<Value = Vec<Station>> {
        proptest::collection::vec((any::<bool>(), -0.01f64..0.01, -0.015f64..0.015), 2..25).prop_map(
            |stops| {
                stops
                    .into_iter()
                    .enumerate()
                    .map(|(i, (tram, dlat, dlon))| {
                        let mode = if tram { TransportMode::Tram } else { TransportMode::Bus };
                        testing::station(&format!("S{i}"), mode, 53.48 + dlat, -2.24 + dlon)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn links_are_symmetric_and_complete(stations in layout(), margin in 50u32..1500) {
            let timetable = testing::stations_only(stations);
            let (mut graph, _) = GraphBuilder::new(GraphConfig::default()).build(&timetable);
            let locations = StationLocations::from_timetable(&timetable);
            let config = NeighbourConfig::new(margin, 80);
            NeighbourLinker::new(config.clone()).create_neighbours(&mut graph, &locations, &timetable);

            let ids: Vec<StationId> = graph.stations().cloned().collect();
            for a in &ids {
                for b in &ids {
                    if a == b {
                        continue;
                    }
                    let linked = graph.neighbours_for(a).contains(b);
                    prop_assert_eq!(linked, graph.neighbours_for(b).contains(a));
                    prop_assert_eq!(graph.neighbour_cost(a, b), graph.neighbour_cost(b, a));

                    let close = locations.within_walk(a, b, margin);
                    let modes_differ = timetable.effective_modes(a) != timetable.effective_modes(b);
                    prop_assert_eq!(linked, close && modes_differ, "{} {}", a, b);
                    if linked {
                        let distance = locations.distance(a, b).unwrap_or(u32::MAX);
                        prop_assert_eq!(graph.neighbour_cost(a, b), Some(config.walk_minutes(distance)));
                        prop_assert!(graph.is_interchange(a));
                    }
                }
            }
        }

        #[test]
        fn walk_is_at_least_distance_over_speed(distance in 0u32..20_000, speed in 1u32..200) {
            let minutes = walk_minutes(distance, speed);
            prop_assert!(minutes >= 1);
            prop_assert!(minutes * speed >= distance);
            prop_assert!(minutes == 1 || (minutes - 1) * speed < distance);
        }
    }
}
