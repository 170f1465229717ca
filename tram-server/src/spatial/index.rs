//! R-tree index of station positions.

use std::collections::{BTreeMap, HashMap};

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use tracing::{debug, warn};

use crate::domain::{Station, StationId, TimePoint};
use crate::timetable::Timetable;

use super::{BoundingBox, BoxWithStations, GridPosition, Projection};

#[derive(Debug, Clone, PartialEq)]
struct StationNode {
    id: StationId,
    position: GridPosition,
}

impl RTreeObject for StationNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.position.as_point())
    }
}

impl PointDistance for StationNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let [e, n] = self.position.as_point();
        let de = e - point[0];
        let dn = n - point[1];
        de * de + dn * dn
    }
}

/// A station found near a query point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NearbyStation {
    pub id: StationId,
    pub distance_metres: u32,
}

/// Projected positions of every station, searchable by distance.
#[derive(Debug, Clone)]
pub struct StationLocations {
    projection: Projection,
    positions: BTreeMap<StationId, GridPosition>,
    tree: RTree<StationNode>,
    bounds: Option<BoundingBox>,
}

impl StationLocations {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            positions: BTreeMap::new(),
            tree: RTree::new(),
            bounds: None,
        }
    }

    /// Index every station of a timetable, projected around their mean
    /// latitude.
    pub fn from_timetable(timetable: &Timetable) -> Self {
        let projection = Projection::centred_on(timetable.stations.iter().map(|s| &s.location));
        let mut locations = Self::new(projection);
        for station in &timetable.stations {
            locations.add_station(station);
        }
        debug!(stations = locations.len(), "indexed station locations");
        locations
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Record a station's position. Returns false, and records nothing, if
    /// its coordinates are unusable. Adding a station again moves it.
    pub fn add_station(&mut self, station: &Station) -> bool {
        if !station.location.is_valid() {
            warn!(station = %station.id, "station has invalid coordinates, not indexed");
            return false;
        }
        let position = self.projection.project(station.location);

        if let Some(old) = self.positions.insert(station.id.clone(), position) {
            self.tree.remove(&StationNode {
                id: station.id.clone(),
                position: old,
            });
        }
        self.tree.insert(StationNode {
            id: station.id.clone(),
            position,
        });

        match &mut self.bounds {
            Some(bounds) => bounds.include(position),
            None => self.bounds = Some(BoundingBox::at(position)),
        }
        true
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Box covering every indexed station.
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    pub fn position_of(&self, station: &StationId) -> Option<GridPosition> {
        self.positions.get(station).copied()
    }

    /// Up to `max_count` stations within `radius_km` of `position`, nearest
    /// first. Ties are broken by station id. A radius that is negative or not
    /// finite finds nothing.
    pub fn nearest_stations(
        &self,
        position: GridPosition,
        max_count: usize,
        radius_km: f64,
    ) -> Vec<NearbyStation> {
        if max_count == 0 || !radius_km.is_finite() || radius_km < 0.0 {
            return Vec::new();
        }
        // Squaring must stay within i64
        let radius = (radius_km * 1000.0).floor().min(f64::from(i32::MAX)) as i64;
        let limit = radius * radius;

        let mut found: Vec<(i64, &StationId)> = self
            .in_square(position, radius)
            .filter_map(|node| {
                let squared = node.position.distance_squared(position);
                (squared <= limit).then_some((squared, &node.id))
            })
            .collect();
        found.sort();

        found
            .into_iter()
            .take(max_count)
            .map(|(squared, id)| NearbyStation {
                id: id.clone(),
                distance_metres: (squared as f64).sqrt().round() as u32,
            })
            .collect()
    }

    /// Every station no more than `radius_metres` from `position` by
    /// [`distance`](Self::distance), nearest first.
    pub fn stations_within(&self, position: GridPosition, radius_metres: u32) -> Vec<NearbyStation> {
        let mut found: Vec<(u32, &StationId)> = self
            .in_square(position, i64::from(radius_metres) + 1)
            .filter_map(|node| {
                let distance = node.position.distance(position);
                (distance <= radius_metres).then_some((distance, &node.id))
            })
            .collect();
        found.sort();
        found
            .into_iter()
            .map(|(distance_metres, id)| NearbyStation {
                id: id.clone(),
                distance_metres,
            })
            .collect()
    }

    fn in_square(&self, centre: GridPosition, half_side: i64) -> impl Iterator<Item = &StationNode> {
        let search = AABB::from_corners(
            [
                (centre.easting - half_side) as f64,
                (centre.northing - half_side) as f64,
            ],
            [
                (centre.easting + half_side) as f64,
                (centre.northing + half_side) as f64,
            ],
        );
        self.tree.locate_in_envelope(&search)
    }

    /// Rounded distance between two indexed stations.
    pub fn distance(&self, a: &StationId, b: &StationId) -> Option<u32> {
        Some(self.position_of(a)?.distance(self.position_of(b)?))
    }

    /// True if both stations are indexed and no more than `margin_metres`
    /// apart.
    pub fn within_walk(&self, a: &StationId, b: &StationId, margin_metres: u32) -> bool {
        self.distance(a, b).is_some_and(|d| d <= margin_metres)
    }

    /// Split the covered area into square cells of `cell_size_metres` and
    /// list the stations in each non-empty cell.
    pub fn get_stations_in_grids(&self, cell_size_metres: u32) -> Vec<BoxWithStations> {
        let Some(bounds) = self.bounds else {
            return Vec::new();
        };
        if cell_size_metres == 0 {
            return Vec::new();
        }
        let size = i64::from(cell_size_metres);

        let mut cells: BTreeMap<(i64, i64), Vec<StationId>> = BTreeMap::new();
        for (id, position) in &self.positions {
            let column = (position.easting - bounds.min_easting) / size;
            let row = (position.northing - bounds.min_northing) / size;
            cells.entry((column, row)).or_default().push(id.clone());
        }

        cells
            .into_iter()
            .map(|((column, row), stations)| {
                let min = GridPosition::new(
                    bounds.min_easting + column * size,
                    bounds.min_northing + row * size,
                );
                let max = GridPosition::new(min.easting + size - 1, min.northing + size - 1);
                BoxWithStations {
                    bounds: BoundingBox::from_corners(min, max),
                    stations,
                }
            })
            .collect()
    }
}

/// Number of stop calls in each grid cell departing between `begin` and
/// `end` inclusive, in the same order as `grids`.
pub fn count_calls_in_grid(
    grids: &[BoxWithStations],
    timetable: &Timetable,
    begin: TimePoint,
    end: TimePoint,
) -> Vec<(BoundingBox, usize)> {
    let mut calls_per_station: HashMap<&StationId, usize> = HashMap::new();
    for call in timetable.trips.iter().flat_map(|t| &t.calls) {
        if call.departure.between(begin, end) {
            *calls_per_station.entry(&call.station).or_default() += 1;
        }
    }

    grids
        .iter()
        .map(|cell| {
            let count = cell
                .stations
                .iter()
                .map(|s| calls_per_station.get(s).copied().unwrap_or(0))
                .sum();
            (cell.bounds, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LatLong, TransportMode};
    use crate::testing;

    fn station(id: &str, lat: f64, lon: f64) -> Station {
        Station::new(id, id, TransportMode::Tram, LatLong::new(lat, lon))
    }

    fn locations() -> StationLocations {
        let mut locations = StationLocations::new(Projection::new(53.48));
        locations.add_station(&station("HERE", 53.4800, -2.2400));
        locations.add_station(&station("NEAR", 53.4810, -2.2400));
        locations.add_station(&station("MID", 53.4850, -2.2400));
        locations.add_station(&station("FAR", 53.5200, -2.2400));
        locations
    }

    #[test]
    fn nearest_orders_by_distance_and_respects_radius() {
        let locations = locations();
        let here = locations.position_of(&StationId::new("HERE")).unwrap();

        let found = locations.nearest_stations(here, 10, 1.0);
        let ids: Vec<_> = found.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["HERE", "NEAR", "MID"]);
        assert_eq!(found[0].distance_metres, 0);
        assert_eq!(found[2].distance_metres, 556);

        let found = locations.nearest_stations(here, 2, 1.0);
        assert_eq!(found.len(), 2);

        assert!(locations.nearest_stations(here, 0, 1.0).is_empty());
        assert!(locations.nearest_stations(here, 5, f64::NAN).is_empty());
        assert!(locations.nearest_stations(here, 5, f64::INFINITY).is_empty());
        assert!(locations.nearest_stations(here, 5, -1.0).is_empty());
        assert_eq!(locations.nearest_stations(here, 10, f64::MAX).len(), 4);
    }

    #[test]
    fn envelope_corner_excluded_by_exact_check() {
        let mut locations = StationLocations::new(Projection::new(0.0));
        locations.add_station(&station("O", 0.0, 0.0));
        // About 800m east and 800m north: inside the 1km box, outside the circle
        locations.add_station(&station("CORNER", 0.0072, 0.0072));
        let origin = locations.position_of(&StationId::new("O")).unwrap();

        let found = locations.nearest_stations(origin, 10, 1.0);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, StationId::new("O"));
    }

    #[test]
    fn invalid_coordinates_skipped() {
        let mut locations = StationLocations::new(Projection::new(0.0));
        assert!(!locations.add_station(&station("BAD", 95.0, 0.0)));
        assert!(locations.is_empty());
        assert!(locations.bounds().is_none());
    }

    #[test]
    fn re_adding_moves_station() {
        let mut locations = locations();
        locations.add_station(&station("FAR", 53.4801, -2.2400));
        assert_eq!(locations.len(), 4);
        let here = locations.position_of(&StationId::new("HERE")).unwrap();
        let ids: Vec<_> = locations
            .nearest_stations(here, 10, 0.05)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, vec![StationId::new("HERE"), StationId::new("FAR")]);
    }

    #[test]
    fn stations_within_has_no_count_cap() {
        let locations = locations();
        let here = locations.position_of(&StationId::new("HERE")).unwrap();
        let ids: Vec<_> = locations
            .stations_within(here, 556)
            .into_iter()
            .map(|n| n.id)
            .collect();
        assert_eq!(ids, ["HERE", "NEAR", "MID"].map(StationId::new));
        assert_eq!(locations.stations_within(here, 555).len(), 2);
    }

    #[test]
    fn walk_distance() {
        let locations = locations();
        let here = StationId::new("HERE");
        let mid = StationId::new("MID");
        assert_eq!(locations.distance(&here, &mid), Some(556));
        assert!(locations.within_walk(&here, &mid, 600));
        assert!(!locations.within_walk(&here, &mid, 500));
        assert!(!locations.within_walk(&here, &StationId::new("NOWHERE"), 10_000));
    }

    #[test]
    fn grid_buckets_cover_every_station() {
        let locations = locations();
        let grids = locations.get_stations_in_grids(1000);
        let total: usize = grids.iter().map(|g| g.stations.len()).sum();
        assert_eq!(total, 4);
        assert_eq!(grids.len(), 2);
        for cell in &grids {
            for id in &cell.stations {
                assert!(cell.bounds.contains(locations.position_of(id).unwrap()));
            }
        }
        assert!(locations.get_stations_in_grids(0).is_empty());
    }

    #[test]
    fn counts_calls_in_window() {
        let timetable = testing::two_route_timetable();
        let locations = StationLocations::from_timetable(&timetable);
        let grids = locations.get_stations_in_grids(100_000);
        assert_eq!(grids.len(), 1);

        let counts = count_calls_in_grid(&grids, &timetable, testing::t("10:00"), testing::t("10:10"));
        // A, B, C from R1 and C from R2 (10:12) is outside
        assert_eq!(counts[0].1, 3);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    use crate::domain::{LatLong, TransportMode};

    fn indexed(offsets: &[(f64, f64)]) -> StationLocations {
        let mut locations = StationLocations::new(Projection::new(53.48));
        for (i, (dlat, dlon)) in offsets.iter().enumerate() {
            let location = LatLong::new(53.48 + dlat, -2.24 + dlon);
            locations.add_station(&Station::new(format!("S{i}").as_str(), "", TransportMode::Bus, location));
        }
        locations
    }

    proptest! {
        #[test]
        fn nearest_is_ordered_and_inside_radius(
            offsets in proptest::collection::vec((-0.03f64..0.03, -0.05f64..0.05), 1..40),
            from in any::<prop::sample::Index>(),
            count in 1usize..50,
            radius_km in 0.0f64..4.0,
        ) {
            let locations = indexed(&offsets);
            let centre = StationId::new(format!("S{}", from.index(offsets.len())));
            let position = locations.position_of(&centre).unwrap();
            let radius = (radius_km * 1000.0).floor() as u32;

            let found = locations.nearest_stations(position, count, radius_km);
            prop_assert!(found.len() <= count);
            prop_assert!(found.windows(2).all(|w| w[0].distance_metres <= w[1].distance_metres));
            prop_assert!(found.iter().all(|n| n.distance_metres <= radius));

            // Only the count cap leaves anything inside the radius out
            if found.len() < count {
                let inside = (0..offsets.len())
                    .filter(|i| {
                        let other = locations.position_of(&StationId::new(format!("S{i}"))).unwrap();
                        other.distance_squared(position) <= i64::from(radius) * i64::from(radius)
                    })
                    .count();
                prop_assert_eq!(found.len(), inside);
            }
        }

        #[test]
        fn stations_within_matches_pairwise_distance(
            offsets in proptest::collection::vec((-0.03f64..0.03, -0.05f64..0.05), 1..40),
            from in any::<prop::sample::Index>(),
            radius in 0u32..4000,
        ) {
            let locations = indexed(&offsets);
            let centre = StationId::new(format!("S{}", from.index(offsets.len())));
            let position = locations.position_of(&centre).unwrap();

            let found = locations.stations_within(position, radius);
            prop_assert!(found.windows(2).all(|w| w[0].distance_metres <= w[1].distance_metres));
            for i in 0..offsets.len() {
                let id = StationId::new(format!("S{i}"));
                let listed = found.iter().any(|n| n.id == id);
                prop_assert_eq!(listed, locations.within_walk(&centre, &id, radius));
            }
        }
    }
}
