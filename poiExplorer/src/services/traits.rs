// Traits abstracting the external services the coordinator depends on

use crate::data::poi::{Coordinate, PlaceMatch, RawPoi};
use crate::error::{CollaboratorError, GeolocationFailure};

pub trait Geocoder {
    /// An empty list is a valid answer, not an error.
    fn search(&self, text: &str) -> Result<Vec<PlaceMatch>, CollaboratorError>;
}

pub trait PoiSource {
    fn query_by_category_near(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<RawPoi>, CollaboratorError>;
}

pub trait GeolocationProvider {
    /// One-shot fix, not a stream.
    fn current_position(&self) -> Result<Coordinate, GeolocationFailure>;
}

pub trait RoutingService {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RawRoute, CollaboratorError>;
}

/// Axis order of the pairs in a [`RawRoute`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrder {
    LatLon,
    /// GeoJSON order, used by OSRM and most routing engines.
    LonLat,
}

/// Route geometry exactly as the routing service produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRoute {
    pub axis_order: AxisOrder,
    pub points: Vec<[f64; 2]>,
}

impl RawRoute {
    pub fn lon_lat(points: Vec<[f64; 2]>) -> Self {
        Self { axis_order: AxisOrder::LonLat, points }
    }

    pub fn lat_lon(points: Vec<[f64; 2]>) -> Self {
        Self { axis_order: AxisOrder::LatLon, points }
    }
}
