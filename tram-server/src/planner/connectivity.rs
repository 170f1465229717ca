//! Which routes can be reached from which, and with how many changes.
//!
//! Matrix `k` (counting from one) has a bit at `(a, b)` when route `b` can
//! be reached from route `a` with at most `k` changes. The search uses it
//! to skip boarding routes that cannot reach the destination within the
//! change limit.

use std::collections::BTreeSet;

use crate::bitmap::{IndexedBitSet, RouteIndex, RouteIndexPair, SimpleBitmap};
use crate::domain::RouteId;
use crate::graph::Graph;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConnectivity {
    /// Single-change links between routes.
    base: IndexedBitSet,
    /// `degrees[k - 1]` is the at-most-`k`-changes matrix.
    degrees: Vec<IndexedBitSet>,
}

impl RouteConnectivity {
    /// Connectivity of every route in the graph, up to `max_degree`
    /// changes.
    ///
    /// Two routes are one change apart when they both call at an
    /// interchange, or call at two stations linked by a walk.
    pub fn build(graph: &Graph, max_degree: usize) -> Self {
        let index = graph.route_index();
        let mut base = IndexedBitSet::square(index.len());

        for station in graph.interchanges() {
            let here = route_indexes(index, graph.routes_at(station));
            let mut reachable = here.clone();
            for neighbour in graph.neighbours_for(station) {
                reachable.extend(route_indexes(index, graph.routes_at(&neighbour)));
            }
            for from in &here {
                for to in &reachable {
                    if from != to {
                        base.set(*from, *to);
                    }
                }
            }
        }

        Self::from_base(base, max_degree)
    }

    fn from_base(base: IndexedBitSet, max_degree: usize) -> Self {
        let mut degrees = Vec::with_capacity(max_degree);
        if max_degree >= 1 {
            degrees.push(base.clone());
        }
        if max_degree >= 2 {
            let pairs: Vec<RouteIndexPair> = base
                .get_pairs()
                .map(|(a, b)| RouteIndexPair::of(a as u16, b as u16))
                .collect();
            let mut second = base.clone();
            for group in RouteIndexPair::create_all_unique_groups(&pairs) {
                let ends = group.ends();
                second.set(usize::from(ends.first()), usize::from(ends.second()));
            }
            degrees.push(second);
        }
        while degrees.len() < max_degree {
            let next = compose(&degrees[degrees.len() - 1], &base);
            degrees.push(next);
        }
        Self { base, degrees }
    }

    /// Number of routes covered.
    pub fn size(&self) -> usize {
        self.base.rows()
    }

    pub fn max_degree(&self) -> usize {
        self.degrees.len()
    }

    /// The same connectivity with every link through a route not in
    /// `running` removed.
    pub fn restrict(&self, running: &SimpleBitmap) -> Self {
        let mut base = self.base.clone();
        for route in 0..self.size() {
            if !running.get(route) {
                let cross = base.copy_row_and_column(route, route);
                base.and_not(&cross);
            }
        }
        Self::from_base(base, self.max_degree())
    }

    /// True if `to` is reachable from `from` with at most `changes` changes.
    pub fn is_reachable(&self, from: usize, to: usize, changes: usize) -> bool {
        if from == to {
            return true;
        }
        let degree = changes.min(self.max_degree());
        degree > 0 && self.degrees[degree - 1].is_set(from, to)
    }

    /// Fewest changes needed to get from `route` onto any route in
    /// `targets`, if no more than `limit`.
    pub fn min_changes(&self, route: usize, targets: &SimpleBitmap, limit: usize) -> Option<usize> {
        if targets.get(route) {
            return Some(0);
        }
        let limit = limit.min(self.max_degree());
        (1..=limit).find(|k| self.degrees[k - 1].get_row(route).intersects(targets))
    }
}

fn route_indexes<'a>(index: &RouteIndex, routes: impl Iterator<Item = &'a RouteId>) -> BTreeSet<usize> {
    routes
        .filter_map(|r| index.index_of(r))
        .map(usize::from)
        .collect()
}

/// Routes reachable via `reached`, then one more change along `base`.
fn compose(reached: &IndexedBitSet, base: &IndexedBitSet) -> IndexedBitSet {
    let mut result = reached.clone();
    for row in 0..reached.rows() {
        for via in reached.get_row(row).ones() {
            result.insert_row(row, &base.get_row(via).to_bitmap());
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A chain of routes, each one change from the next.
    fn chain(len: usize, max_degree: usize) -> RouteConnectivity {
        let mut base = IndexedBitSet::square(len);
        for i in 0..len - 1 {
            base.set(i, i + 1);
            base.set(i + 1, i);
        }
        RouteConnectivity::from_base(base, max_degree)
    }

    fn targets(size: usize, set: &[usize]) -> SimpleBitmap {
        let mut bitmap = SimpleBitmap::create(size);
        for i in set {
            bitmap.set(*i);
        }
        bitmap
    }

    #[test]
    fn degrees_grow_along_chain() {
        let conn = chain(5, 3);
        assert!(conn.is_reachable(0, 1, 1));
        assert!(!conn.is_reachable(0, 2, 1));
        assert!(conn.is_reachable(0, 2, 2));
        assert!(conn.is_reachable(0, 3, 3));
        assert!(!conn.is_reachable(0, 4, 3));
        assert!(conn.is_reachable(2, 2, 0));
        assert!(!conn.is_reachable(0, 1, 0));
    }

    #[test]
    fn min_changes_finds_fewest() {
        let conn = chain(5, 3);
        assert_eq!(conn.min_changes(0, &targets(5, &[0]), 3), Some(0));
        assert_eq!(conn.min_changes(0, &targets(5, &[3]), 3), Some(3));
        assert_eq!(conn.min_changes(0, &targets(5, &[2, 3]), 3), Some(2));
        assert_eq!(conn.min_changes(0, &targets(5, &[3]), 2), None);
        assert_eq!(conn.min_changes(0, &targets(5, &[4]), 10), None);
    }

    #[test]
    fn restricting_removes_paths_through_route() {
        let conn = chain(4, 3);
        let running = targets(4, &[0, 1, 3]);
        let restricted = conn.restrict(&running);
        assert!(restricted.is_reachable(0, 1, 1));
        assert!(!restricted.is_reachable(0, 3, 3));
        assert!(!restricted.is_reachable(1, 2, 1));
        assert_eq!(restricted.max_degree(), 3);
    }

    #[test]
    fn built_from_graph_interchanges() {
        use crate::graph::{GraphBuilder, GraphConfig};
        let (graph, _) = GraphBuilder::new(GraphConfig::default()).build(&crate::testing::two_route_timetable());
        let conn = RouteConnectivity::build(&graph, 3);
        let index = graph.route_index();
        let r1 = usize::from(index.index_of(&RouteId::new("R1")).unwrap());
        let r2 = usize::from(index.index_of(&RouteId::new("R2")).unwrap());
        assert!(conn.is_reachable(r1, r2, 1));
        assert!(conn.is_reachable(r2, r1, 1));
        assert_eq!(conn.size(), 2);
    }

    #[test]
    fn zero_degree_only_knows_same_route() {
        let conn = chain(3, 0);
        assert_eq!(conn.min_changes(0, &targets(3, &[1]), 5), None);
        assert_eq!(conn.min_changes(1, &targets(3, &[1]), 5), Some(0));
    }
}
