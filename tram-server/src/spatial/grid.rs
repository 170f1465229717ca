//! Planar grid positions and bounding boxes, in whole metres.

use serde::{Deserialize, Serialize};

use crate::domain::StationId;

/// Position on the projected grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub easting: i64,
    pub northing: i64,
}

impl GridPosition {
    pub fn new(easting: i64, northing: i64) -> Self {
        Self { easting, northing }
    }

    /// Squared distance in square metres. Exact, no rounding.
    pub fn distance_squared(&self, other: GridPosition) -> i64 {
        let de = self.easting - other.easting;
        let dn = self.northing - other.northing;
        de * de + dn * dn
    }

    /// Euclidean distance rounded to whole metres.
    pub fn distance(&self, other: GridPosition) -> u32 {
        (self.distance_squared(other) as f64).sqrt().round() as u32
    }

    pub(crate) fn as_point(&self) -> [f64; 2] {
        [self.easting as f64, self.northing as f64]
    }
}

/// Axis-aligned box on the grid, edges inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_easting: i64,
    pub min_northing: i64,
    pub max_easting: i64,
    pub max_northing: i64,
}

impl BoundingBox {
    /// Box spanning two opposite corners given in any order.
    pub fn from_corners(a: GridPosition, b: GridPosition) -> Self {
        Self {
            min_easting: a.easting.min(b.easting),
            min_northing: a.northing.min(b.northing),
            max_easting: a.easting.max(b.easting),
            max_northing: a.northing.max(b.northing),
        }
    }

    /// Zero-sized box at a single position.
    pub fn at(position: GridPosition) -> Self {
        Self::from_corners(position, position)
    }

    /// Grow to cover `position`.
    pub fn include(&mut self, position: GridPosition) {
        self.min_easting = self.min_easting.min(position.easting);
        self.min_northing = self.min_northing.min(position.northing);
        self.max_easting = self.max_easting.max(position.easting);
        self.max_northing = self.max_northing.max(position.northing);
    }

    pub fn width(&self) -> i64 {
        self.max_easting - self.min_easting
    }

    pub fn height(&self) -> i64 {
        self.max_northing - self.min_northing
    }

    pub fn contains(&self, position: GridPosition) -> bool {
        (self.min_easting..=self.max_easting).contains(&position.easting)
            && (self.min_northing..=self.max_northing).contains(&position.northing)
    }

    /// True if `position` lies inside this box grown by `margin` metres on
    /// every side.
    pub fn within(&self, margin: i64, position: GridPosition) -> bool {
        self.grown(margin).contains(position)
    }

    pub fn grown(&self, margin: i64) -> BoundingBox {
        BoundingBox {
            min_easting: self.min_easting - margin,
            min_northing: self.min_northing - margin,
            max_easting: self.max_easting + margin,
            max_northing: self.max_northing + margin,
        }
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.min_easting <= other.max_easting
            && other.min_easting <= self.max_easting
            && self.min_northing <= other.max_northing
            && other.min_northing <= self.max_northing
    }
}

/// A grid cell and the stations inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxWithStations {
    pub bounds: BoundingBox,
    pub stations: Vec<StationId>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(e: i64, n: i64) -> GridPosition {
        GridPosition::new(e, n)
    }

    #[test]
    fn distance_rounds_to_metres() {
        assert_eq!(pos(0, 0).distance(pos(3, 4)), 5);
        assert_eq!(pos(0, 0).distance(pos(1, 1)), 1);
        assert_eq!(pos(0, 0).distance(pos(2, 2)), 3);
        assert_eq!(pos(10, 10).distance_squared(pos(13, 14)), 25);
    }

    #[test]
    fn box_contains_edges() {
        let bounds = BoundingBox::from_corners(pos(10, 20), pos(0, 0));
        assert_eq!(bounds.width(), 10);
        assert_eq!(bounds.height(), 20);
        assert!(bounds.contains(pos(0, 0)));
        assert!(bounds.contains(pos(10, 20)));
        assert!(!bounds.contains(pos(11, 5)));
    }

    #[test]
    fn within_margin() {
        let bounds = BoundingBox::at(pos(100, 100));
        assert!(bounds.within(50, pos(150, 60)));
        assert!(!bounds.within(50, pos(151, 100)));
    }

    #[test]
    fn include_grows() {
        let mut bounds = BoundingBox::at(pos(0, 0));
        bounds.include(pos(-5, 7));
        assert_eq!(bounds, BoundingBox::from_corners(pos(-5, 0), pos(0, 7)));
    }

    #[test]
    fn overlapping_boxes() {
        let a = BoundingBox::from_corners(pos(0, 0), pos(10, 10));
        let b = BoundingBox::from_corners(pos(10, 10), pos(20, 20));
        let c = BoundingBox::from_corners(pos(11, 0), pos(20, 9));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c));
    }
}
