//! What runs on a given date.

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, Weekday};
use tracing::debug;

use crate::bitmap::SimpleBitmap;
use crate::domain::ServiceId;
use crate::graph::{Graph, Node, NodeId, Relationship};

use super::connectivity::RouteConnectivity;

/// Services and routes running on one date, with route connectivity
/// restricted to them.
///
/// Services of the previous date are carried over, since their calls after
/// midnight fall early on this one.
#[derive(Debug)]
pub struct DayContext {
    date: NaiveDate,
    running_services: HashSet<ServiceId>,
    carried_services: HashSet<ServiceId>,
    running_routes: SimpleBitmap,
    connectivity: RouteConnectivity,
}

impl DayContext {
    /// `max_degree` is the most changes the connectivity answers for.
    pub fn new(graph: &Graph, date: NaiveDate, max_degree: usize) -> Self {
        let running_services: HashSet<ServiceId> = graph.services_running_on(date).cloned().collect();
        let carried_services: HashSet<ServiceId> = date
            .pred_opt()
            .map(|previous| graph.services_running_on(previous).cloned().collect())
            .unwrap_or_default();

        let index = graph.route_index();
        let mut running_routes = SimpleBitmap::create(index.len());
        for edge in graph.relationships() {
            let Relationship::ToService { service, .. } = &edge.relationship else {
                continue;
            };
            let runs = running_services.contains(service)
                || (carried_services.contains(service) && runs_past_midnight(graph, edge.to));
            if !runs {
                continue;
            }
            if let Node::RouteStation { route, .. } = graph.node(edge.from) {
                if let Some(i) = index.index_of(route) {
                    running_routes.set(usize::from(i));
                }
            }
        }

        let connectivity = RouteConnectivity::build(graph, max_degree).restrict(&running_routes);
        debug!(
            %date,
            services = running_services.len(),
            carried = carried_services.len(),
            routes = running_routes.cardinality(),
            "prepared day context"
        );
        Self {
            date,
            running_services,
            carried_services,
            running_routes,
            connectivity,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn weekday(&self) -> Weekday {
        self.date.weekday()
    }

    /// Weekday of the previous date, whose services are carried over.
    pub fn previous_weekday(&self) -> Weekday {
        self.date.weekday().pred()
    }

    pub fn is_running(&self, service: &ServiceId) -> bool {
        self.running_services.contains(service)
    }

    /// True if `service` ran on the previous date. Only its calls after
    /// midnight are of use.
    pub fn is_carried(&self, service: &ServiceId) -> bool {
        self.carried_services.contains(service)
    }

    pub fn route_running(&self, route: usize) -> bool {
        route < self.running_routes.size() && self.running_routes.get(route)
    }

    pub fn running_route_count(&self) -> usize {
        self.running_routes.cardinality()
    }

    pub fn connectivity(&self) -> &RouteConnectivity {
        &self.connectivity
    }
}

/// True if the service node has calls in a next-day hour bucket.
fn runs_past_midnight(graph: &Graph, service_node: NodeId) -> bool {
    graph
        .outgoing(service_node)
        .any(|edge| matches!(edge.relationship, Relationship::ToHour { hour } if hour >= 24))
}
