use serde::{Deserialize, Serialize};
use crate::data::poi::Coordinate;

/// Axis-aligned latitude/longitude box, as a map widget's `fitBounds` expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl MapBounds {
    pub fn from_point(point: Coordinate) -> Self {
        Self {
            south: point.latitude,
            west: point.longitude,
            north: point.latitude,
            east: point.longitude,
        }
    }

    /// Smallest box holding every point, or `None` for an empty iterator.
    pub fn from_points<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Coordinate>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut bounds = Self::from_point(first);
        for point in points {
            bounds.extend(point);
        }
        Some(bounds)
    }

    pub fn extend(&mut self, point: Coordinate) {
        self.south = self.south.min(point.latitude);
        self.north = self.north.max(point.latitude);
        self.west = self.west.min(point.longitude);
        self.east = self.east.max(point.longitude);
    }

    pub fn contains(&self, point: &Coordinate) -> bool {
        point.latitude >= self.south
            && point.latitude <= self.north
            && point.longitude >= self.west
            && point.longitude <= self.east
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new((self.south + self.north) / 2.0, (self.west + self.east) / 2.0)
    }

    pub fn is_degenerate(&self) -> bool {
        self.south == self.north && self.west == self.east
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_iterator_has_no_bounds() {
        assert!(MapBounds::from_points(Vec::new()).is_none());
    }

    #[test]
    fn bounds_cover_every_point() {
        let points = vec![
            Coordinate::new(28.61, 77.20),
            Coordinate::new(28.70, 77.10),
            Coordinate::new(28.55, 77.30),
        ];
        let bounds = MapBounds::from_points(points.clone()).unwrap();
        for p in &points {
            assert!(bounds.contains(p));
        }
        assert_eq!(bounds.south, 28.55);
        assert_eq!(bounds.north, 28.70);
        assert_eq!(bounds.west, 77.10);
        assert_eq!(bounds.east, 77.30);
        assert!(!bounds.contains(&Coordinate::new(28.80, 77.20)));
    }

    #[test]
    fn single_point_is_degenerate() {
        let bounds = MapBounds::from_point(Coordinate::new(1.0, 2.0));
        assert!(bounds.is_degenerate());
        assert_eq!(bounds.center(), Coordinate::new(1.0, 2.0));
    }
}
