//! Geospatial index of stations.
//!
//! Coordinates are projected onto a local planar grid in whole metres.
//! Nearest-station queries use an R-tree envelope search followed by an
//! exact squared-distance check.

mod grid;
mod index;
mod projection;

pub use grid::{BoundingBox, BoxWithStations, GridPosition};
pub use index::{NearbyStation, StationLocations, count_calls_in_grid};
pub use projection::Projection;
