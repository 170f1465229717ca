//! Dense numbering of routes for the bitmap index.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::RouteId;

/// Maps route ids to dense `u16` indexes, in sorted id order so that the
/// same set of routes always gets the same numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<RouteId>", into = "Vec<RouteId>")]
pub struct RouteIndex {
    routes: Vec<RouteId>,
    lookup: HashMap<RouteId, u16>,
}

impl RouteIndex {
    /// # Panics
    ///
    /// Panics if there are more distinct routes than fit in a `u16`.
    pub fn new(routes: impl IntoIterator<Item = RouteId>) -> Self {
        let mut routes: Vec<RouteId> = routes.into_iter().collect();
        routes.sort();
        routes.dedup();
        assert!(
            routes.len() <= usize::from(u16::MAX) + 1,
            "too many routes for the route index: {}",
            routes.len()
        );
        let lookup = routes
            .iter()
            .enumerate()
            .map(|(i, r)| (r.clone(), i as u16))
            .collect();
        Self { routes, lookup }
    }

    pub fn index_of(&self, route: &RouteId) -> Option<u16> {
        self.lookup.get(route).copied()
    }

    pub fn route_at(&self, index: u16) -> Option<&RouteId> {
        self.routes.get(usize::from(index))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u16, &RouteId)> {
        self.routes.iter().enumerate().map(|(i, r)| (i as u16, r))
    }
}

impl From<Vec<RouteId>> for RouteIndex {
    fn from(routes: Vec<RouteId>) -> Self {
        Self::new(routes)
    }
}

impl From<RouteIndex> for Vec<RouteId> {
    fn from(index: RouteIndex) -> Self {
        index.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorted_and_deduplicated() {
        let index = RouteIndex::new(["R2", "R1", "R2", "B7"].map(RouteId::from));
        assert_eq!(index.len(), 3);
        assert_eq!(index.index_of(&RouteId::new("B7")), Some(0));
        assert_eq!(index.index_of(&RouteId::new("R1")), Some(1));
        assert_eq!(index.index_of(&RouteId::new("R2")), Some(2));
        assert_eq!(index.index_of(&RouteId::new("X")), None);
        assert_eq!(index.route_at(1), Some(&RouteId::new("R1")));
        assert_eq!(index.route_at(3), None);
    }

    #[test]
    fn serializes_as_route_list() {
        let index = RouteIndex::new(["R2", "R1"].map(RouteId::from));
        let json = serde_json::to_string(&index).unwrap();
        assert_eq!(json, r#"["R1","R2"]"#);
        let back: RouteIndex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, index);
    }
}
