//! The frozen transit graph.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize, Serializer};

use crate::bitmap::RouteIndex;
use crate::domain::{CompositeId, FeedInfo, PlatformId, RouteId, ServiceCalendar, ServiceId, StationId};

use super::{DataVersion, Edge, GraphConfig, Node, NodeId, Relationship, RelationshipId};

/// The persisted part of a graph; every lookup table is derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GraphData {
    version: DataVersion,
    costs: GraphConfig,
    #[serde(default)]
    feed: Option<FeedInfo>,
    /// Calendars of the services that have trips in the graph.
    #[serde(default)]
    calendars: BTreeMap<ServiceId, ServiceCalendar>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    interchanges: BTreeSet<StationId>,
    neighbours: BTreeMap<StationId, BTreeMap<StationId, u32>>,
    route_index: RouteIndex,
}

/// Time-expanded transit graph.
///
/// Built once per timetable version and read-only afterwards, apart from
/// the neighbour pass which only ever adds walking links.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "GraphData")]
pub struct Graph {
    data: GraphData,
    outgoing: Vec<Vec<RelationshipId>>,
    incoming: Vec<Vec<RelationshipId>>,
    stations: HashMap<StationId, NodeId>,
    platforms: HashMap<PlatformId, NodeId>,
    route_stations: HashMap<(RouteId, StationId), NodeId>,
    composites: HashMap<CompositeId, NodeId>,
    station_routes: BTreeMap<StationId, BTreeSet<RouteId>>,
}

impl TryFrom<GraphData> for Graph {
    type Error = String;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let GraphData {
            version,
            costs,
            feed,
            calendars,
            nodes,
            edges,
            interchanges,
            neighbours,
            route_index,
        } = data;

        let node_count = nodes.len();
        let mut graph = Graph::empty(version, costs);
        for node in nodes {
            graph.add_node(node);
        }
        for edge in edges {
            if edge.from.index() >= node_count || edge.to.index() >= node_count {
                return Err(format!(
                    "relationship {:?} -> {:?} refers to a missing node",
                    edge.from, edge.to
                ));
            }
            graph.add_edge(edge.from, edge.to, edge.relationship);
        }
        graph.data.feed = feed;
        graph.data.calendars = calendars;
        graph.data.interchanges = interchanges;
        graph.data.neighbours = neighbours;
        graph.data.route_index = route_index;
        Ok(graph)
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.data.serialize(serializer)
    }
}

impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Graph {
    pub(crate) fn empty(version: DataVersion, costs: GraphConfig) -> Self {
        Self {
            data: GraphData {
                version,
                costs,
                feed: None,
                calendars: BTreeMap::new(),
                nodes: Vec::new(),
                edges: Vec::new(),
                interchanges: BTreeSet::new(),
                neighbours: BTreeMap::new(),
                route_index: RouteIndex::new(Vec::<RouteId>::new()),
            },
            outgoing: Vec::new(),
            incoming: Vec::new(),
            stations: HashMap::new(),
            platforms: HashMap::new(),
            route_stations: HashMap::new(),
            composites: HashMap::new(),
            station_routes: BTreeMap::new(),
        }
    }

    pub(crate) fn add_node(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.data.nodes.len() as u32);
        match &node {
            Node::Station { station } => {
                self.stations.insert(station.clone(), id);
            }
            Node::Platform { platform, .. } => {
                self.platforms.insert(platform.clone(), id);
            }
            Node::RouteStation { route, station, .. } => {
                self.route_stations
                    .insert((route.clone(), station.clone()), id);
                self.station_routes
                    .entry(station.clone())
                    .or_default()
                    .insert(route.clone());
            }
            Node::Composite { composite } => {
                self.composites.insert(composite.clone(), id);
            }
            Node::Service { .. } | Node::Hour { .. } | Node::Minute { .. } => {}
        }
        self.data.nodes.push(node);
        self.outgoing.push(Vec::new());
        self.incoming.push(Vec::new());
        id
    }

    pub(crate) fn add_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        relationship: Relationship,
    ) -> RelationshipId {
        let id = RelationshipId(self.data.edges.len() as u32);
        self.data.edges.push(Edge {
            from,
            to,
            relationship,
        });
        self.outgoing[from.index()].push(id);
        self.incoming[to.index()].push(id);
        id
    }

    pub(crate) fn set_route_index(&mut self, index: RouteIndex) {
        self.data.route_index = index;
    }

    pub(crate) fn set_feed(&mut self, feed: FeedInfo) {
        self.data.feed = Some(feed);
    }

    pub(crate) fn add_calendar(&mut self, service: ServiceId, calendar: ServiceCalendar) {
        self.data.calendars.insert(service, calendar);
    }

    pub fn version(&self) -> &DataVersion {
        &self.data.version
    }

    pub fn costs(&self) -> &GraphConfig {
        &self.data.costs
    }

    /// Feed the graph was built from; absent for hand-assembled graphs.
    pub fn feed(&self) -> Option<&FeedInfo> {
        self.data.feed.as_ref()
    }

    pub fn calendar(&self, service: &ServiceId) -> Option<&ServiceCalendar> {
        self.data.calendars.get(service)
    }

    /// Services running on `date`.
    pub fn services_running_on(&self, date: chrono::NaiveDate) -> impl Iterator<Item = &ServiceId> {
        self.data
            .calendars
            .iter()
            .filter(move |(_, calendar)| calendar.operates_on(date))
            .map(|(service, _)| service)
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.data.nodes[id.index()]
    }

    pub fn edge(&self, id: RelationshipId) -> &Edge {
        &self.data.edges[id.index()]
    }

    pub fn node_count(&self) -> usize {
        self.data.nodes.len()
    }

    pub fn relationship_count(&self) -> usize {
        self.data.edges.len()
    }

    /// Every relationship, in insertion order.
    pub fn relationships(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.data.edges.iter()
    }

    /// Relationships leaving `node`, in insertion order.
    pub fn outgoing(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.outgoing[node.index()].iter().map(|id| self.edge(*id))
    }

    /// Relationships arriving at `node`, in insertion order.
    pub fn incoming(&self, node: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        self.incoming[node.index()].iter().map(|id| self.edge(*id))
    }

    pub fn station_node(&self, station: &StationId) -> Option<NodeId> {
        self.stations.get(station).copied()
    }

    pub fn platform_node(&self, platform: &PlatformId) -> Option<NodeId> {
        self.platforms.get(platform).copied()
    }

    pub fn route_station_node(&self, route: &RouteId, station: &StationId) -> Option<NodeId> {
        self.route_stations
            .get(&(route.clone(), station.clone()))
            .copied()
    }

    pub fn composite_node(&self, composite: &CompositeId) -> Option<NodeId> {
        self.composites.get(composite).copied()
    }

    pub fn has_station(&self, station: &StationId) -> bool {
        self.stations.contains_key(station)
    }

    /// Every station, sorted by id.
    pub fn stations(&self) -> impl Iterator<Item = &StationId> {
        let mut ids: Vec<_> = self.stations.keys().collect();
        ids.sort();
        ids.into_iter()
    }

    /// Routes calling at a station.
    pub fn routes_at(&self, station: &StationId) -> impl Iterator<Item = &RouteId> {
        self.station_routes.get(station).into_iter().flatten()
    }

    /// Member stations of a composite, following its grouping edges.
    pub fn composite_members(&self, composite: &CompositeId) -> BTreeSet<StationId> {
        let Some(node) = self.composite_node(composite) else {
            return BTreeSet::new();
        };
        self.outgoing(node)
            .filter(|edge| matches!(edge.relationship, Relationship::Grouped))
            .filter_map(|edge| self.node(edge.to).station().cloned())
            .collect()
    }

    pub fn route_index(&self) -> &RouteIndex {
        &self.data.route_index
    }

    pub fn is_interchange(&self, station: &StationId) -> bool {
        self.data.interchanges.contains(station)
    }

    pub fn interchanges(&self) -> &BTreeSet<StationId> {
        &self.data.interchanges
    }

    /// Flag a station as an interchange, switching its boarding and
    /// departing relationships to the interchange variants. Returns false
    /// if it already was one.
    pub fn mark_interchange(&mut self, station: &StationId) -> bool {
        if !self.data.interchanges.insert(station.clone()) {
            return false;
        }
        let Some(station_node) = self.station_node(station) else {
            return true;
        };

        // Boarding happens from the station or from one of its platforms
        let mut access = vec![station_node];
        access.extend(
            self.outgoing[station_node.index()]
                .iter()
                .map(|id| &self.data.edges[id.index()])
                .filter(|edge| matches!(edge.relationship, Relationship::EnterPlatform { .. }))
                .map(|edge| edge.to),
        );

        let board_cost = self.data.costs.interchange_board_cost;
        let depart_cost = self.data.costs.interchange_depart_cost;
        for node in access {
            for id in &self.outgoing[node.index()] {
                let edge = &mut self.data.edges[id.index()];
                if let Relationship::Board { .. } = edge.relationship {
                    edge.relationship = Relationship::InterchangeBoard { cost: board_cost };
                }
            }
            for id in &self.incoming[node.index()] {
                let edge = &mut self.data.edges[id.index()];
                if let Relationship::Depart { .. } = edge.relationship {
                    edge.relationship = Relationship::InterchangeDepart { cost: depart_cost };
                }
            }
        }
        true
    }

    /// Link two stations with a walk in both directions. Returns false if
    /// they were already linked, or are not both in the graph.
    pub fn add_neighbour(&mut self, a: &StationId, b: &StationId, cost: u32) -> bool {
        if a == b || self.neighbour_cost(a, b).is_some() {
            return false;
        }
        let (Some(node_a), Some(node_b)) = (self.station_node(a), self.station_node(b)) else {
            return false;
        };
        self.add_edge(node_a, node_b, Relationship::Neighbour { cost });
        self.add_edge(node_b, node_a, Relationship::Neighbour { cost });
        self.data
            .neighbours
            .entry(a.clone())
            .or_default()
            .insert(b.clone(), cost);
        self.data
            .neighbours
            .entry(b.clone())
            .or_default()
            .insert(a.clone(), cost);
        true
    }

    /// Stations linked to `station` by a walk.
    pub fn neighbours_for(&self, station: &StationId) -> BTreeSet<StationId> {
        self.data
            .neighbours
            .get(station)
            .map(|linked| linked.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn neighbour_cost(&self, a: &StationId, b: &StationId) -> Option<u32> {
        self.data.neighbours.get(a)?.get(b).copied()
    }

    /// Number of linked station pairs.
    pub fn neighbour_pair_count(&self) -> usize {
        self.data.neighbours.values().map(BTreeMap::len).sum::<usize>() / 2
    }
}
