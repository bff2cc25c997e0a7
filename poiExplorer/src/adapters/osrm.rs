//! OSRM `/route/v1/driving` responses requested with `geometries=geojson`.
//!
//! GeoJSON puts longitude first, so the route is returned tagged
//! [`AxisOrder::LonLat`] and left for `route_overlay::normalize_path` to swap.

use serde::Deserialize;

use crate::error::AdapterError;
use crate::services::traits::RawRoute;

#[derive(Debug, Deserialize)]
pub struct OsrmResponse {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub routes: Vec<OsrmRoute>,
}

/// Only the geometry is read; the route length comes from the drawn path.
#[derive(Debug, Deserialize)]
pub struct OsrmRoute {
    pub geometry: OsrmGeometry,
}

#[derive(Debug, Deserialize)]
pub struct OsrmGeometry {
    pub coordinates: Vec<[f64; 2]>,
}

impl OsrmResponse {
    /// First route's geometry. Zero routes yields an empty route, which the
    /// overlay treats as unavailable.
    pub fn into_raw_route(self) -> Result<RawRoute, AdapterError> {
        if self.code != "Ok" {
            return Err(AdapterError::ServiceCode {
                message: self.message.unwrap_or_default(),
                code: self.code,
            });
        }
        let points = self
            .routes
            .into_iter()
            .next()
            .map(|route| route.geometry.coordinates)
            .unwrap_or_default();
        Ok(RawRoute::lon_lat(points))
    }
}

pub fn parse_route_response(json: &str) -> Result<RawRoute, AdapterError> {
    let response: OsrmResponse = serde_json::from_str(json)?;
    response.into_raw_route()
}
