//! Journey search over the time-expanded graph.
//!
//! Each query time gets its own best-first traversal, ordered by the time
//! reached. The traversal only boards services running on the requested
//! date (or still running from the day before, after midnight), only
//! changes at interchanges, and skips any route that the connectivity
//! bitmaps say cannot reach the destination within the change limit.

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap, HashMap, HashSet};
use std::sync::Arc;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::bitmap::SimpleBitmap;
use crate::cache::{CacheConfig, DayCache};
use crate::domain::{
    ChangeStage, DomainError, Journey, MINUTES_PER_DAY, PlatformId, RideStage, RouteId,
    ServiceId, Stage, StationId, TimePoint, TransportMode, TripId, WalkStage,
};
use crate::graph::{Graph, GraphError, GraphStore, Node, NodeId, Relationship};
use crate::neighbours::walk_minutes;
use crate::spatial::StationLocations;

use super::config::SearchConfig;
use super::day::DayContext;
use super::rank::{deduplicate, rank_journeys};
use super::request::{JourneyRequest, Limits, Location};

/// Error from journey search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// The graph store cannot be read. Distinct from finding no journeys.
    #[error("journey planning is unavailable")]
    Unavailable,

    #[error("graph error: {0}")]
    Graph(GraphError),
}

impl From<GraphError> for SearchError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::Unavailable => SearchError::Unavailable,
            other => SearchError::Graph(other),
        }
    }
}

/// Result of journey search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Found journeys, ranked best-first.
    pub journeys: Vec<Journey>,

    /// States expanded over every query time.
    pub states_explored: usize,

    /// True if a state or time bound stopped a traversal early, so better
    /// journeys may exist.
    pub truncated: bool,
}

impl SearchResult {
    /// Create an empty result.
    pub fn empty() -> Self {
        Self {
            journeys: Vec::new(),
            states_explored: 0,
            truncated: false,
        }
    }
}

/// Answers journey requests against whatever graph the store holds.
pub struct RouteSearchEngine {
    store: Arc<dyn GraphStore>,
    locations: Arc<StationLocations>,
    config: SearchConfig,
    days: DayCache,
}

impl RouteSearchEngine {
    pub fn new(
        store: Arc<dyn GraphStore>,
        locations: Arc<StationLocations>,
        config: SearchConfig,
    ) -> Self {
        let days = DayCache::new(&CacheConfig::default(), config.max_changes);
        Self {
            store,
            locations,
            config,
            days,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Find journeys for a request.
    ///
    /// Query times are searched in parallel, each in its own read
    /// transaction. An empty journey list is a valid answer.
    pub fn search(&self, request: &JourneyRequest) -> Result<SearchResult, SearchError> {
        request.validate()?;
        let limits = request.limits(&self.config);

        let (origins, destinations) = {
            let txn = self.store.begin_read()?;
            check_date(&txn, request)?;
            (
                resolve(&txn, &request.origins)?,
                resolve(&txn, &request.destinations)?,
            )
        };
        if let Some(station) = origins.intersection(&destinations).next() {
            return Err(SearchError::InvalidRequest(format!(
                "station {station} is both origin and destination"
            )));
        }

        let outcomes = request
            .query_times
            .par_iter()
            .map(|&query_time| -> Result<Outcome, SearchError> {
                let txn = self.store.begin_read()?;
                let day = self.days.get(&txn, request.date);
                let mut outcome =
                    Traversal::new(&txn, &day, &self.config, limits, &destinations, query_time)
                        .run(&origins);
                outcome
                    .journeys
                    .extend(self.direct_walks(&origins, &destinations, query_time, limits));
                Ok(outcome)
            })
            .collect::<Result<Vec<_>, SearchError>>()?;

        let mut result = SearchResult::empty();
        let mut journeys = Vec::new();
        for outcome in outcomes {
            result.states_explored += outcome.states;
            result.truncated |= outcome.truncated;
            journeys.extend(outcome.journeys);
        }

        journeys.retain(|j| {
            !j.departs_before_query() && j.duration_minutes() <= limits.max_journey_mins
        });
        let mut journeys = rank_journeys(deduplicate(journeys));
        journeys.truncate(limits.max_results);
        result.journeys = journeys;

        debug!(
            date = %request.date,
            query_times = request.query_times.len(),
            journeys = result.journeys.len(),
            states = result.states_explored,
            truncated = result.truncated,
            "search complete"
        );
        Ok(result)
    }

    /// Walks straight from an origin to a destination close enough by
    /// distance, whether or not the graph links them.
    fn direct_walks(
        &self,
        origins: &BTreeSet<StationId>,
        destinations: &BTreeSet<StationId>,
        query_time: TimePoint,
        limits: Limits,
    ) -> Vec<Journey> {
        let mut journeys = Vec::new();
        for origin in origins {
            for destination in destinations {
                let Some(distance) = self.locations.distance(origin, destination) else {
                    continue;
                };
                if distance > self.config.direct_walk_margin_metres {
                    continue;
                }
                let cost = walk_minutes(distance, self.config.walk_speed_m_per_min);
                if cost > limits.max_journey_mins {
                    continue;
                }
                let walk = WalkStage::new(origin.clone(), destination.clone(), query_time, cost)
                    .and_then(|walk| Journey::new(vec![Stage::Walk(walk)], query_time));
                match walk {
                    Ok(journey) => journeys.push(journey),
                    Err(err) => trace!(%origin, %destination, error = %err, "direct walk dropped"),
                }
            }
        }
        journeys
    }
}

fn check_date(graph: &Graph, request: &JourneyRequest) -> Result<(), SearchError> {
    match graph.feed() {
        Some(feed) if !feed.covers(request.date) => Err(SearchError::InvalidRequest(format!(
            "date {} is outside the timetable ({} to {})",
            request.date, feed.valid_from, feed.valid_until
        ))),
        _ => Ok(()),
    }
}

/// Stations a set of locations stands for.
fn resolve(graph: &Graph, locations: &[Location]) -> Result<BTreeSet<StationId>, SearchError> {
    let mut stations = BTreeSet::new();
    for location in locations {
        match location {
            Location::Station(id) => {
                if !graph.has_station(id) {
                    return Err(SearchError::InvalidRequest(format!("unknown station {id}")));
                }
                stations.insert(id.clone());
            }
            Location::Composite(id) => {
                let members = graph.composite_members(id);
                if members.is_empty() {
                    return Err(SearchError::InvalidRequest(format!(
                        "unknown composite station {id}"
                    )));
                }
                stations.extend(members);
            }
        }
    }
    Ok(stations)
}

/// How a traveller came to be standing at a station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Arrival {
    Origin,
    Alighted,
    Walked,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum At {
    Station {
        node: NodeId,
        arrival: Arrival,
    },
    /// On board a trip, stopped at a route station.
    OnTrip {
        node: NodeId,
        trip: TripId,
        service: ServiceId,
        /// The trip belongs to the previous day's service.
        carried: bool,
        can_alight: bool,
    },
}

/// What happened to reach a label from its parent.
#[derive(Debug, Clone)]
enum Step {
    Start,
    Board {
        route: RouteId,
        trip: TripId,
        mode: TransportMode,
        platform: Option<PlatformId>,
        departure: TimePoint,
    },
    Ride,
    Alight,
    Walk {
        cost: u32,
    },
}

#[derive(Debug, Clone)]
struct Label {
    at: At,
    time: TimePoint,
    rides: usize,
    parent: Option<usize>,
    step: Step,
}

struct Outcome {
    journeys: Vec<Journey>,
    states: usize,
    truncated: bool,
}

/// One best-first traversal for a single query time.
struct Traversal<'a> {
    graph: &'a Graph,
    day: &'a DayContext,
    config: &'a SearchConfig,
    limits: Limits,
    query_time: TimePoint,
    /// Nothing later than this is worth reaching.
    horizon: TimePoint,
    destinations: HashSet<NodeId>,
    /// Routes calling at a destination or at a station a walk away from one.
    destination_routes: SimpleBitmap,
    labels: Vec<Label>,
    queue: BinaryHeap<Reverse<(TimePoint, usize)>>,
    /// Labels expanded per position and ride count.
    settled: HashMap<(At, usize), usize>,
    journeys: Vec<Journey>,
    /// Time of the latest destination label recorded.
    last_arrival: Option<TimePoint>,
    states: usize,
    truncated: bool,
}

impl<'a> Traversal<'a> {
    fn new(
        graph: &'a Graph,
        day: &'a DayContext,
        config: &'a SearchConfig,
        limits: Limits,
        destinations: &BTreeSet<StationId>,
        query_time: TimePoint,
    ) -> Self {
        let horizon = query_time
            .plus_minutes(config.max_wait_mins.saturating_add(limits.max_journey_mins))
            .unwrap_or(TimePoint::END_OF_NEXT_DAY);

        let index = graph.route_index();
        let mut destination_routes = SimpleBitmap::create(index.len());
        for station in destinations {
            let mut nearby = graph.neighbours_for(station);
            nearby.insert(station.clone());
            for route in nearby.iter().flat_map(|s| graph.routes_at(s)) {
                if let Some(i) = index.index_of(route) {
                    destination_routes.set(usize::from(i));
                }
            }
        }

        Self {
            graph,
            day,
            config,
            limits,
            query_time,
            horizon,
            destinations: destinations
                .iter()
                .filter_map(|s| graph.station_node(s))
                .collect(),
            destination_routes,
            labels: Vec::new(),
            queue: BinaryHeap::new(),
            settled: HashMap::new(),
            journeys: Vec::new(),
            last_arrival: None,
            states: 0,
            truncated: false,
        }
    }

    fn run(mut self, origins: &BTreeSet<StationId>) -> Outcome {
        for origin in origins {
            if let Some(node) = self.graph.station_node(origin) {
                self.push(Label {
                    at: At::Station {
                        node,
                        arrival: Arrival::Origin,
                    },
                    time: self.query_time,
                    rides: 0,
                    parent: None,
                    step: Step::Start,
                });
            }
        }

        let started = Instant::now();
        let budget = self.config.time_budget();
        while let Some(Reverse((time, index))) = self.queue.pop() {
            // Journeys arriving with the last one kept still compete on changes
            if self.journeys.len() >= self.limits.max_results
                && self.last_arrival.is_some_and(|last| time > last)
            {
                break;
            }
            if self.states >= self.config.max_states
                || (self.states % 1024 == 1023 && started.elapsed() > budget)
            {
                debug!(states = self.states, query_time = %self.query_time, "search bound reached");
                self.truncated = true;
                break;
            }

            let key = (self.labels[index].at.clone(), self.labels[index].rides);
            let expanded = self.settled.entry(key).or_insert(0);
            if *expanded >= self.limits.max_results {
                continue;
            }
            *expanded += 1;
            self.states += 1;
            self.expand(index);
        }

        debug!(
            query_time = %self.query_time,
            states = self.states,
            journeys = self.journeys.len(),
            "traversal finished"
        );
        Outcome {
            journeys: self.journeys,
            states: self.states,
            truncated: self.truncated,
        }
    }

    fn push(&mut self, label: Label) {
        if label.time > self.horizon {
            return;
        }
        let full = self
            .settled
            .get(&(label.at.clone(), label.rides))
            .is_some_and(|n| *n >= self.limits.max_results);
        if full {
            return;
        }
        let index = self.labels.len();
        self.queue.push(Reverse((label.time, index)));
        self.labels.push(label);
    }

    fn expand(&mut self, index: usize) {
        let label = self.labels[index].clone();
        match label.at {
            At::Station { node, arrival } => self.expand_station(index, &label, node, arrival),
            At::OnTrip {
                node,
                ref trip,
                ref service,
                carried,
                can_alight,
            } => {
                self.continue_trip(index, &label, node, trip, service, carried);
                if can_alight {
                    self.alight(index, &label, node);
                }
            }
        }
    }

    fn expand_station(&mut self, index: usize, label: &Label, node: NodeId, arrival: Arrival) {
        let graph = self.graph;
        if self.destinations.contains(&node) {
            self.record(index);
            return;
        }
        let Some(station) = graph.node(node).station() else {
            return;
        };

        let may_board = arrival == Arrival::Origin || graph.is_interchange(station);
        if may_board && label.rides <= self.limits.max_changes {
            self.board(index, label, node, label.time, None);
            for edge in graph.outgoing(node) {
                if let Relationship::EnterPlatform { cost } = edge.relationship {
                    if let (Node::Platform { platform, .. }, Ok(ready)) =
                        (graph.node(edge.to), label.time.plus_minutes(cost))
                    {
                        self.board(index, label, edge.to, ready, Some(platform.clone()));
                    }
                }
            }
        }

        // No two walks in a row
        if arrival != Arrival::Walked {
            for edge in graph.outgoing(node) {
                let Relationship::Neighbour { cost } = edge.relationship else {
                    continue;
                };
                if cost > self.config.max_walk_mins {
                    continue;
                }
                let Ok(time) = label.time.plus_minutes(cost) else {
                    continue;
                };
                self.push(Label {
                    at: At::Station {
                        node: edge.to,
                        arrival: Arrival::Walked,
                    },
                    time,
                    rides: label.rides,
                    parent: Some(index),
                    step: Step::Walk { cost },
                });
            }
        }
    }

    /// Board any trip leaving from `access` (a station or platform) within
    /// the wait limit.
    fn board(
        &mut self,
        index: usize,
        label: &Label,
        access: NodeId,
        ready: TimePoint,
        platform: Option<PlatformId>,
    ) {
        let graph = self.graph;
        let route_index = graph.route_index();
        let remaining = self.limits.max_changes - label.rides;

        for board in graph.outgoing(access) {
            if !board.relationship.is_boarding() {
                continue;
            }
            let Node::RouteStation { route, mode, .. } = graph.node(board.to) else {
                continue;
            };
            let Some(route_position) = route_index.index_of(route).map(usize::from) else {
                continue;
            };
            if !self.day.route_running(route_position) {
                continue;
            }
            if self
                .day
                .connectivity()
                .min_changes(route_position, &self.destination_routes, remaining)
                .is_none()
            {
                trace!(route = %route, "route cannot reach destination, pruned");
                continue;
            }
            let Ok(earliest) = ready.plus_minutes(board.relationship.cost()) else {
                continue;
            };
            let latest = earliest
                .plus_minutes(self.config.max_wait_mins)
                .unwrap_or(TimePoint::END_OF_NEXT_DAY);

            for to_service in graph.outgoing(board.to) {
                let Relationship::ToService {
                    service,
                    days_running,
                } = &to_service.relationship
                else {
                    continue;
                };
                let frames = [
                    (false, days_running.contains(self.day.weekday()) && self.day.is_running(service)),
                    (
                        true,
                        days_running.contains(self.day.previous_weekday()) && self.day.is_carried(service),
                    ),
                ];
                for (carried, runs) in frames {
                    if !runs {
                        continue;
                    }
                    for to_hour in graph.outgoing(to_service.to) {
                        let Relationship::ToHour { hour } = to_hour.relationship else {
                            continue;
                        };
                        let Some(hour) = hour_in_frame(hour, carried) else {
                            continue;
                        };
                        if !hour_overlaps(hour, earliest, latest) {
                            continue;
                        }
                        for to_minute in graph.outgoing(to_hour.to) {
                            let Relationship::ToMinute { trip, pickup, .. } = &to_minute.relationship
                            else {
                                continue;
                            };
                            let Node::Minute { time, .. } = graph.node(to_minute.to) else {
                                continue;
                            };
                            let Some(time) = time_in_frame(*time, carried) else {
                                continue;
                            };
                            if !pickup || !time.between(earliest, latest) || self.trip_used(index, trip) {
                                continue;
                            }
                            for on_route in graph.outgoing(to_minute.to) {
                                let Relationship::OnRoute { cost, dropoff, .. } = on_route.relationship
                                else {
                                    continue;
                                };
                                let Ok(arrival) = time.plus_minutes(cost) else {
                                    continue;
                                };
                                self.push(Label {
                                    at: At::OnTrip {
                                        node: on_route.to,
                                        trip: trip.clone(),
                                        service: service.clone(),
                                        carried,
                                        can_alight: dropoff,
                                    },
                                    time: arrival,
                                    rides: label.rides + 1,
                                    parent: Some(index),
                                    step: Step::Board {
                                        route: route.clone(),
                                        trip: trip.clone(),
                                        mode: *mode,
                                        platform: platform.clone(),
                                        departure: time,
                                    },
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    /// Stay on board to the trip's next stop.
    fn continue_trip(
        &mut self,
        index: usize,
        label: &Label,
        node: NodeId,
        trip: &TripId,
        service: &ServiceId,
        carried: bool,
    ) {
        let graph = self.graph;
        for to_service in graph.outgoing(node) {
            match &to_service.relationship {
                Relationship::ToService { service: s, .. } if s == service => {}
                _ => continue,
            }
            for to_hour in graph.outgoing(to_service.to) {
                let Relationship::ToHour { hour } = to_hour.relationship else {
                    continue;
                };
                let Some(hour) = hour_in_frame(hour, carried) else {
                    continue;
                };
                if !hour_overlaps(hour, label.time, TimePoint::END_OF_NEXT_DAY) {
                    continue;
                }
                for to_minute in graph.outgoing(to_hour.to) {
                    match &to_minute.relationship {
                        Relationship::ToMinute { trip: t, .. } if t == trip => {}
                        _ => continue,
                    }
                    let Node::Minute { time, .. } = graph.node(to_minute.to) else {
                        continue;
                    };
                    let Some(time) = time_in_frame(*time, carried) else {
                        continue;
                    };
                    if time.is_before(label.time) {
                        continue;
                    }
                    for on_route in graph.outgoing(to_minute.to) {
                        let Relationship::OnRoute { cost, dropoff, .. } = on_route.relationship
                        else {
                            continue;
                        };
                        let Ok(arrival) = time.plus_minutes(cost) else {
                            continue;
                        };
                        self.push(Label {
                            at: At::OnTrip {
                                node: on_route.to,
                                trip: trip.clone(),
                                service: service.clone(),
                                carried,
                                can_alight: dropoff,
                            },
                            time: arrival,
                            rides: label.rides,
                            parent: Some(index),
                            step: Step::Ride,
                        });
                    }
                }
            }
        }
    }

    /// Get off at the current stop, onto the station itself.
    fn alight(&mut self, index: usize, label: &Label, node: NodeId) {
        let graph = self.graph;
        let mut reached: HashMap<NodeId, u32> = HashMap::new();
        for depart in graph.outgoing(node) {
            if !depart.relationship.is_departing() {
                continue;
            }
            let cost = depart.relationship.cost();
            match graph.node(depart.to) {
                Node::Station { .. } => {
                    let best = reached.entry(depart.to).or_insert(cost);
                    *best = (*best).min(cost);
                }
                Node::Platform { .. } => {
                    for leave in graph.outgoing(depart.to) {
                        if let Relationship::LeavePlatform { cost: leave_cost } = leave.relationship {
                            let best = reached.entry(leave.to).or_insert(cost + leave_cost);
                            *best = (*best).min(cost + leave_cost);
                        }
                    }
                }
                _ => {}
            }
        }

        let mut reached: Vec<_> = reached.into_iter().collect();
        reached.sort();
        for (station, cost) in reached {
            let Ok(time) = label.time.plus_minutes(cost) else {
                continue;
            };
            self.push(Label {
                at: At::Station {
                    node: station,
                    arrival: Arrival::Alighted,
                },
                time,
                rides: label.rides,
                parent: Some(index),
                step: Step::Alight,
            });
        }
    }

    /// True if the path to `index` already rode `trip`.
    fn trip_used(&self, index: usize, trip: &TripId) -> bool {
        let mut current = Some(index);
        while let Some(i) = current {
            let label = &self.labels[i];
            if let Step::Board { trip: used, .. } = &label.step {
                if used == trip {
                    return true;
                }
            }
            current = label.parent;
        }
        false
    }

    fn record(&mut self, index: usize) {
        self.last_arrival = Some(self.labels[index].time);
        match self.journey_to(index) {
            Ok(journey) if journey.duration_minutes() <= self.limits.max_journey_mins => {
                trace!(
                    arrival = %journey.arrival_time(),
                    changes = journey.change_count(),
                    "journey found"
                );
                self.journeys.push(journey);
            }
            Ok(_) => {}
            Err(err) => debug!(error = %err, "discarded inconsistent journey"),
        }
    }

    fn station_of(&self, node: NodeId) -> Option<StationId> {
        self.graph.node(node).station().cloned()
    }

    /// Rebuild the stages leading to a label.
    fn journey_to(&self, index: usize) -> Result<Journey, DomainError> {
        let mut path = Vec::new();
        let mut current = Some(index);
        while let Some(i) = current {
            path.push(i);
            current = self.labels[i].parent;
        }
        path.reverse();

        let first = &self.labels[path[0]];
        let node_of = |at: &At| match at {
            At::Station { node, .. } | At::OnTrip { node, .. } => *node,
        };
        let Some(mut last_station) = self.station_of(node_of(&first.at)) else {
            return Err(DomainError::EmptyJourney);
        };
        let mut last_time = first.time;

        let mut stages = Vec::new();
        let mut ride: Option<RideStage> = None;
        let mut waiting: Option<(StationId, TimePoint)> = None;

        for &i in &path[1..] {
            let label = &self.labels[i];
            let Some(station) = self.station_of(node_of(&label.at)) else {
                continue;
            };
            match &label.step {
                Step::Start => {}
                Step::Board {
                    route,
                    trip,
                    mode,
                    platform,
                    departure,
                } => {
                    if let Some((at, arrive)) = waiting.take() {
                        stages.push(Stage::Change(ChangeStage {
                            station: at,
                            arrive,
                            depart: *departure,
                        }));
                    }
                    ride = Some(RideStage {
                        mode: *mode,
                        route: route.clone(),
                        trip: trip.clone(),
                        from: last_station.clone(),
                        to: station,
                        platform: platform.clone(),
                        departure: *departure,
                        arrival: label.time,
                        calling_points: Vec::new(),
                    });
                }
                Step::Ride => {
                    if let Some(ride) = ride.as_mut() {
                        let passed = std::mem::replace(&mut ride.to, station);
                        ride.calling_points.push(passed);
                        ride.arrival = label.time;
                    }
                }
                Step::Alight => {
                    if let Some(ride) = ride.take() {
                        waiting = Some((ride.to.clone(), ride.arrival));
                        stages.push(Stage::Ride(ride));
                    }
                    last_station = station;
                    last_time = label.time;
                }
                Step::Walk { cost } => {
                    waiting = None;
                    stages.push(Stage::Walk(WalkStage::new(
                        last_station.clone(),
                        station.clone(),
                        last_time,
                        *cost,
                    )?));
                    last_station = station;
                    last_time = label.time;
                }
            }
        }

        Journey::new(stages, self.query_time)
    }
}

/// A call time of a trip as seen from the query's service day. Calls of a
/// carried trip before midnight are already past.
fn time_in_frame(time: TimePoint, carried: bool) -> Option<TimePoint> {
    if carried {
        time.minus_minutes(MINUTES_PER_DAY).ok()
    } else {
        Some(time)
    }
}

fn hour_in_frame(hour: u8, carried: bool) -> Option<u8> {
    if carried { hour.checked_sub(24) } else { Some(hour) }
}

/// True if hour bucket `hour` has any minute in `[earliest, latest]`.
fn hour_overlaps(hour: u8, earliest: TimePoint, latest: TimePoint) -> bool {
    let start = u32::from(hour) * 60;
    let end = start + 59;
    end >= earliest.minutes_since_midnight() && start <= latest.minutes_since_midnight()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> TimePoint {
        TimePoint::parse(s).unwrap()
    }

    #[test]
    fn hour_bucket_overlap() {
        assert!(hour_overlaps(10, t("10:59"), t("11:30")));
        assert!(hour_overlaps(10, t("09:30"), t("10:00")));
        assert!(!hour_overlaps(10, t("11:00"), t("12:00")));
        assert!(!hour_overlaps(10, t("08:00"), t("09:59")));
        // Next-day buckets count on from 24
        assert!(hour_overlaps(24, t("23:50"), t("24:10")));
    }

    #[test]
    fn carried_times_move_back_a_day() {
        assert_eq!(time_in_frame(t("24:10"), true), Some(t("00:10")));
        assert_eq!(time_in_frame(t("23:50"), true), None);
        assert_eq!(time_in_frame(t("23:50"), false), Some(t("23:50")));
        assert_eq!(hour_in_frame(24, true), Some(0));
        assert_eq!(hour_in_frame(23, true), None);
        assert_eq!(hour_in_frame(23, false), Some(23));
    }

    #[test]
    fn graph_errors_map_to_search_errors() {
        assert!(matches!(
            SearchError::from(GraphError::Unavailable),
            SearchError::Unavailable
        ));
        let corrupt = serde_json::from_str::<u32>("x").unwrap_err();
        assert!(matches!(
            SearchError::from(GraphError::Corrupt(corrupt)),
            SearchError::Graph(_)
        ));
    }

    #[test]
    fn empty_result() {
        let result = SearchResult::empty();
        assert!(result.journeys.is_empty());
        assert!(!result.truncated);
    }
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod scenario_tests;
