//! Builds the time-expanded graph from a timetable.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::bitmap::RouteIndex;
use crate::domain::{
    DaysOfWeek, Modes, Route, RouteId, Service, ServiceCalendar, ServiceId, StationId, StopCall,
    TimePoint, Trip,
};
use crate::timetable::Timetable;

use super::{DataVersion, Graph, Node, NodeId, Relationship};

/// Fixed costs, in minutes, of the relationships that have no timetable
/// time of their own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub board_cost: u32,
    pub depart_cost: u32,
    pub interchange_board_cost: u32,
    pub interchange_depart_cost: u32,
    pub platform_cost: u32,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            board_cost: 0,
            depart_cost: 0,
            interchange_board_cost: 1,
            interchange_depart_cost: 1,
            platform_cost: 0,
        }
    }
}

/// What a build did with its input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub trips_added: usize,
    pub trips_rejected: usize,
    pub services_skipped: usize,
    pub nodes: usize,
    pub relationships: usize,
}

/// Weekdays a calendar can run on, including the weekdays of added dates.
fn days_running(calendar: &ServiceCalendar) -> DaysOfWeek {
    calendar
        .added
        .iter()
        .fold(calendar.days, |mut days, date| {
            days.set(date.weekday());
            days
        })
}

pub struct GraphBuilder {
    config: GraphConfig,
}

impl GraphBuilder {
    pub fn new(config: GraphConfig) -> Self {
        Self { config }
    }

    /// Build the graph for a timetable.
    ///
    /// Output depends only on the timetable and config: records are visited
    /// in id order so node and relationship ids are reproducible.
    pub fn build(&self, timetable: &Timetable) -> (Graph, BuildReport) {
        let version = DataVersion::of_build(timetable, &self.config);
        let mut build = Build {
            graph: Graph::empty(version, self.config.clone()),
            config: &self.config,
            report: BuildReport::default(),
            interchanges: BTreeSet::new(),
            route_stations: HashMap::new(),
            access_links: HashSet::new(),
            services: HashMap::new(),
            hours: HashMap::new(),
        };

        build.graph.set_feed(timetable.feed.clone());
        build.add_stations(timetable);
        let services = build.usable_services(timetable);
        let trips = build.usable_trips(timetable, &services);
        build.interchanges = find_interchanges(timetable, &trips);

        for (trip, route) in &trips {
            let service = services[&trip.service];
            if build.graph.calendar(&service.id).is_none() {
                build
                    .graph
                    .add_calendar(service.id.clone(), service.calendar.clone());
            }
            build.add_trip(trip, route, service);
        }

        let routes: Vec<RouteId> = trips.iter().map(|(_, route)| route.id.clone()).collect();
        build.graph.set_route_index(RouteIndex::new(routes));

        let Build {
            mut graph,
            mut report,
            interchanges,
            ..
        } = build;
        for station in &interchanges {
            graph.mark_interchange(station);
        }

        report.nodes = graph.node_count();
        report.relationships = graph.relationship_count();
        info!(
            version = %graph.version(),
            trips = report.trips_added,
            rejected = report.trips_rejected,
            services_skipped = report.services_skipped,
            interchanges = interchanges.len(),
            nodes = report.nodes,
            relationships = report.relationships,
            "built graph"
        );
        (graph, report)
    }
}

/// Stations that allow changes: several routes, several modes, or listed
/// by the operator.
fn find_interchanges(timetable: &Timetable, trips: &[(&Trip, &Route)]) -> BTreeSet<StationId> {
    let mut routes: BTreeMap<&StationId, BTreeSet<&RouteId>> = BTreeMap::new();
    let mut modes: BTreeMap<&StationId, Modes> = BTreeMap::new();
    for (trip, route) in trips {
        for call in &trip.calls {
            routes.entry(&call.station).or_default().insert(&route.id);
            modes.entry(&call.station).or_default().insert(route.mode);
        }
    }

    let mut interchanges: BTreeSet<StationId> = routes
        .iter()
        .filter(|(station, routes)| routes.len() > 1 || modes[*station].len() > 1)
        .map(|(station, _)| (*station).clone())
        .collect();
    interchanges.extend(
        timetable
            .interchanges
            .iter()
            .filter(|s| timetable.station(s).is_some())
            .cloned(),
    );
    interchanges
}

struct Build<'a> {
    graph: Graph,
    config: &'a GraphConfig,
    report: BuildReport,
    interchanges: BTreeSet<StationId>,
    route_stations: HashMap<(RouteId, StationId), NodeId>,
    /// Station or platform to route station pairs already linked.
    access_links: HashSet<(NodeId, NodeId)>,
    services: HashMap<(NodeId, ServiceId), NodeId>,
    hours: HashMap<(NodeId, u8), NodeId>,
}

impl<'a> Build<'a> {
    fn add_stations(&mut self, timetable: &Timetable) {
        let mut stations: Vec<_> = timetable.stations.iter().collect();
        stations.sort_by(|a, b| a.id.cmp(&b.id));
        for station in stations {
            self.graph.add_node(Node::Station {
                station: station.id.clone(),
            });
        }

        let mut platforms: Vec<_> = timetable.platforms.iter().collect();
        platforms.sort_by(|a, b| a.id.cmp(&b.id));
        for platform in platforms {
            let Some(station) = self.graph.station_node(&platform.station) else {
                warn!(platform = %platform.id, station = %platform.station, "platform of unknown station skipped");
                continue;
            };
            let node = self.graph.add_node(Node::Platform {
                platform: platform.id.clone(),
                station: platform.station.clone(),
            });
            let cost = self.config.platform_cost;
            self.graph
                .add_edge(station, node, Relationship::EnterPlatform { cost });
            self.graph
                .add_edge(node, station, Relationship::LeavePlatform { cost });
        }

        let mut composites: Vec<_> = timetable.composites.iter().collect();
        composites.sort_by(|a, b| a.id.cmp(&b.id));
        for composite in composites {
            let node = self.graph.add_node(Node::Composite {
                composite: composite.id.clone(),
            });
            for member in &composite.members {
                match self.graph.station_node(member) {
                    Some(station) => {
                        self.graph.add_edge(node, station, Relationship::Grouped);
                        self.graph.add_edge(station, node, Relationship::Grouped);
                    }
                    None => {
                        warn!(composite = %composite.id, station = %member, "composite member unknown")
                    }
                }
            }
        }
    }

    fn usable_services<'t>(&mut self, timetable: &'t Timetable) -> HashMap<ServiceId, &'t Service> {
        let mut usable = HashMap::new();
        for service in &timetable.services {
            if service.calendar.is_empty() {
                warn!(service = %service.id, "service never operates, skipped");
                self.report.services_skipped += 1;
                continue;
            }
            usable.insert(service.id.clone(), service);
        }
        usable
    }

    /// Trips that can go into the graph, sorted by route then id.
    fn usable_trips<'t>(
        &mut self,
        timetable: &'t Timetable,
        services: &HashMap<ServiceId, &'t Service>,
    ) -> Vec<(&'t Trip, &'t Route)> {
        let routes: HashMap<&RouteId, &Route> =
            timetable.routes.iter().map(|r| (&r.id, r)).collect();

        let mut trips = Vec::new();
        for trip in &timetable.trips {
            if !services.contains_key(&trip.service) {
                debug!(trip = %trip.id, service = %trip.service, "trip has no running service");
                continue;
            }
            let Some(route) = routes.get(&trip.route) else {
                warn!(trip = %trip.id, route = %trip.route, "trip of unknown route rejected");
                self.report.trips_rejected += 1;
                continue;
            };
            if let Err(reason) = trip.validate_calls() {
                warn!(trip = %trip.id, reason, "invalid trip rejected");
                self.report.trips_rejected += 1;
                continue;
            }
            if let Some(call) = trip.calls.iter().find(|c| !self.graph.has_station(&c.station)) {
                warn!(trip = %trip.id, station = %call.station, "trip calls at unknown station, rejected");
                self.report.trips_rejected += 1;
                continue;
            }
            trips.push((trip, *route));
        }
        trips.sort_by(|(a, _), (b, _)| (&a.route, &a.id).cmp(&(&b.route, &b.id)));
        trips
    }

    fn add_trip(&mut self, trip: &Trip, route: &Route, service: &Service) {
        let days = days_running(&service.calendar);

        let mut current = self.route_station(route, &trip.calls[0]);
        for pair in trip.calls.windows(2) {
            let (call, next_call) = (&pair[0], &pair[1]);
            let next = self.route_station(route, next_call);

            let service_node = *self
                .services
                .entry((current, service.id.clone()))
                .or_insert_with(|| {
                    let node = self.graph.add_node(Node::Service {
                        route_station: current,
                        service: service.id.clone(),
                    });
                    self.graph.add_edge(
                        current,
                        node,
                        Relationship::ToService {
                            service: service.id.clone(),
                            days_running: days,
                        },
                    );
                    node
                });

            let hour = call.departure.hour_bucket() as u8;
            let hour_node = *self.hours.entry((service_node, hour)).or_insert_with(|| {
                let node = self.graph.add_node(Node::Hour { service_node, hour });
                self.graph
                    .add_edge(service_node, node, Relationship::ToHour { hour });
                node
            });

            let minute = self.graph.add_node(Node::Minute {
                hour_node,
                time: call.departure,
                trip: trip.id.clone(),
            });
            self.graph.add_edge(
                hour_node,
                minute,
                Relationship::ToMinute {
                    cost: call.dwell_minutes(),
                    days_running: days,
                    times_running: vec![call.departure],
                    trip: trip.id.clone(),
                    pickup: call.pickup,
                },
            );
            self.graph.add_edge(
                minute,
                next,
                Relationship::OnRoute {
                    route: route.id.clone(),
                    trip: trip.id.clone(),
                    cost: TimePoint::diff_minutes(call.departure, next_call.arrival),
                    dropoff: next_call.dropoff,
                },
            );
            current = next;
        }
        self.report.trips_added += 1;
    }

    /// Route station for a call, linked to where passengers wait: the call's
    /// platform if it has one, otherwise the station.
    fn route_station(&mut self, route: &Route, call: &StopCall) -> NodeId {
        let key = (route.id.clone(), call.station.clone());
        let node = match self.route_stations.get(&key) {
            Some(node) => *node,
            None => {
                let node = self.graph.add_node(Node::RouteStation {
                    route: route.id.clone(),
                    station: call.station.clone(),
                    mode: route.mode,
                });
                self.route_stations.insert(key, node);
                node
            }
        };

        let access = call
            .platform
            .as_ref()
            .and_then(|p| self.graph.platform_node(p))
            .or_else(|| self.graph.station_node(&call.station));
        let Some(access) = access else {
            return node;
        };
        if self.access_links.insert((access, node)) {
            self.graph.add_edge(
                access,
                node,
                Relationship::Board {
                    cost: self.config.board_cost,
                },
            );
            self.graph.add_edge(
                node,
                access,
                Relationship::Depart {
                    cost: self.config.depart_cost,
                },
            );
        }
        node
    }
}
