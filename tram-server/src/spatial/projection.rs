//! Projection of latitude/longitude onto a local planar grid.

use crate::domain::LatLong;

use super::GridPosition;

/// Mean metres per degree of latitude.
const METRES_PER_DEGREE: f64 = 111_320.0;

/// Equirectangular projection scaled for a reference latitude.
///
/// Distances are accurate to well under one percent within a few tens of
/// kilometres of the reference latitude, which covers a city network.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    reference_latitude: f64,
    metres_per_degree_lon: f64,
}

impl Projection {
    pub fn new(reference_latitude: f64) -> Self {
        Self {
            reference_latitude,
            metres_per_degree_lon: METRES_PER_DEGREE * reference_latitude.to_radians().cos(),
        }
    }

    /// Projection anchored at the mean latitude of `points`, or the equator
    /// when there are none.
    pub fn centred_on<'a>(points: impl IntoIterator<Item = &'a LatLong>) -> Self {
        let (sum, count) = points
            .into_iter()
            .filter(|p| p.is_valid())
            .fold((0.0, 0usize), |(sum, count), p| (sum + p.lat, count + 1));
        if count == 0 {
            Self::new(0.0)
        } else {
            Self::new(sum / count as f64)
        }
    }

    pub fn reference_latitude(&self) -> f64 {
        self.reference_latitude
    }

    pub fn project(&self, location: LatLong) -> GridPosition {
        GridPosition::new(
            (location.lon * self.metres_per_degree_lon).round() as i64,
            (location.lat * METRES_PER_DEGREE).round() as i64,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn northing_is_latitude_scaled() {
        let projection = Projection::new(53.48);
        let a = projection.project(LatLong::new(53.480, -2.24));
        let b = projection.project(LatLong::new(53.485, -2.24));
        assert_eq!(a.easting, b.easting);
        assert_eq!(a.distance(b), 556);
    }

    #[test]
    fn easting_shrinks_with_latitude() {
        let equator = Projection::new(0.0);
        let north = Projection::new(60.0);
        let p = LatLong::new(0.0, 1.0);
        assert_eq!(equator.project(p).easting, 111_320);
        assert_eq!(north.project(p).easting, 55_660);
    }

    #[test]
    fn centred_on_mean() {
        let points = [LatLong::new(50.0, 0.0), LatLong::new(54.0, 0.0), LatLong::new(99.0, 0.0)];
        assert_eq!(Projection::centred_on(&points).reference_latitude(), 52.0);
        assert_eq!(Projection::centred_on(std::iter::empty()).reference_latitude(), 0.0);
    }
}
