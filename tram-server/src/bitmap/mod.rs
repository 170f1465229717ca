//! Bitmaps and bit matrices used to answer "can route A ever hand off to
//! route B" without walking the graph.
//!
//! Indexes are 0-based and sized once per graph version. Out-of-range
//! access panics: it can only happen if the route numbering and the graph
//! have drifted apart.

mod indexed;
mod pairs;
mod route_index;
mod simple;

pub use indexed::IndexedBitSet;
pub use pairs::{Group, RouteIndexPair};
pub use route_index::RouteIndex;
pub use simple::{ImmutableBitmap, SimpleBitmap};
