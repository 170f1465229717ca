//! Route index pairs and the two-hop groups built from them.

use std::collections::{BTreeMap, BTreeSet};

/// An ordered pair of route indexes: a change from `first` to `second` is
/// possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteIndexPair {
    first: u16,
    second: u16,
}

impl RouteIndexPair {
    pub fn of(first: u16, second: u16) -> Self {
        Self { first, second }
    }

    pub fn first(&self) -> u16 {
        self.first
    }

    pub fn second(&self) -> u16 {
        self.second
    }

    /// True for a pair of a route with itself.
    pub fn is_same(&self) -> bool {
        self.first == self.second
    }

    /// All two-hop chains `a -> b` where `a.second == b.first`.
    ///
    /// Self pairs are ignored, as are chains that lead back to where they
    /// started, so every group's two pairs share exactly one index.
    pub fn create_all_unique_groups(pairs: &[RouteIndexPair]) -> BTreeSet<Group> {
        let mut by_first: BTreeMap<u16, Vec<RouteIndexPair>> = BTreeMap::new();
        for pair in pairs.iter().filter(|p| !p.is_same()) {
            by_first.entry(pair.first).or_default().push(*pair);
        }

        let mut groups = BTreeSet::new();
        for a in pairs.iter().filter(|p| !p.is_same()) {
            let Some(following) = by_first.get(&a.second) else {
                continue;
            };
            for b in following {
                if b.second != a.first {
                    groups.insert(Group::new(*a, *b));
                }
            }
        }
        groups
    }
}

/// Two chained pairs, `first.second == second.first`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Group {
    first: RouteIndexPair,
    second: RouteIndexPair,
}

impl Group {
    fn new(first: RouteIndexPair, second: RouteIndexPair) -> Self {
        debug_assert_eq!(first.second, second.first);
        Self { first, second }
    }

    pub fn first(&self) -> RouteIndexPair {
        self.first
    }

    pub fn second(&self) -> RouteIndexPair {
        self.second
    }

    /// The route both pairs pass through.
    pub fn common(&self) -> u16 {
        self.first.second
    }

    /// The pair reachable via this group with one intermediate route.
    pub fn ends(&self) -> RouteIndexPair {
        RouteIndexPair::of(self.first.first, self.second.second)
    }
}
