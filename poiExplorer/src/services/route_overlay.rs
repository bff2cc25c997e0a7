//! Driving route from the device-location anchor to a selected POI.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::core::state::Mode;
use crate::data::poi::Coordinate;
use crate::error::{CollaboratorError, ExplorerError};
use crate::geo::bounds::MapBounds;
use crate::geo::geo_math;
use crate::services::anchor_resolver::Anchor;
use crate::services::traits::{AxisOrder, RawRoute, RoutingService};
use crate::utils::logging::{self, OperationCategory};

/// Route geometry in `{latitude, longitude}` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePath {
    pub points: Vec<Coordinate>,
}

impl RoutePath {
    pub fn bounds(&self) -> Option<MapBounds> {
        MapBounds::from_points(self.points.iter().copied())
    }

    pub fn length_km(&self) -> f64 {
        geo_math::path_length_km(&self.points)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// The one route currently drawn on the map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteState {
    pub path: RoutePath,
    pub source_anchor: Anchor,
    pub destination: Coordinate,
}

pub fn route_permitted(mode: Mode) -> bool {
    mode == Mode::DeviceLocationActive
}

/// Converts a router's pairs to internal coordinates. This is the only place
/// axis order is interpreted.
pub fn normalize_path(raw: RawRoute) -> Result<RoutePath, ExplorerError> {
    let points = raw
        .points
        .iter()
        .map(|pair| {
            let (lat, lon) = match raw.axis_order {
                AxisOrder::LatLon => (pair[0], pair[1]),
                AxisOrder::LonLat => (pair[1], pair[0]),
            };
            Coordinate::try_new(lat, lon).ok_or_else(|| ExplorerError::RouteUnavailable {
                reason: format!("route point ({}, {}) is out of range", lat, lon),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A single point cannot be drawn as a path
    if points.len() < 2 {
        return Err(ExplorerError::RouteUnavailable { reason: "routing service returned no path".to_string() });
    }
    Ok(RoutePath { points })
}

pub fn path_from_response(response: Result<RawRoute, CollaboratorError>) -> Result<RoutePath, ExplorerError> {
    let raw = response.map_err(|e| {
        warn!(error = %e, "routing request failed");
        ExplorerError::RouteUnavailable { reason: e.to_string() }
    })?;
    normalize_path(raw)
}

/// Returns `Ok(None)` without touching the router unless the anchor came
/// from the device's own position.
pub fn compute_route(
    router: &dyn RoutingService,
    mode: Mode,
    from: Coordinate,
    to: Coordinate,
) -> Result<Option<RoutePath>, ExplorerError> {
    if !route_permitted(mode) {
        debug!(?mode, "route skipped outside device-location mode");
        return Ok(None);
    }

    let _timing = logging::start_timing("compute_route", OperationCategory::Routing);
    info!(from_lat = from.latitude, from_lon = from.longitude, to_lat = to.latitude, to_lon = to.longitude, "requesting driving route");

    let path = path_from_response(router.route(from, to))?;
    debug!(points = path.len(), length_km = path.length_km(), "route ready");
    Ok(Some(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingRouter {
        answer: Result<RawRoute, CollaboratorError>,
        calls: Cell<usize>,
    }

    impl RoutingService for CountingRouter {
        fn route(&self, _: Coordinate, _: Coordinate) -> Result<RawRoute, CollaboratorError> {
            self.calls.set(self.calls.get() + 1);
            self.answer.clone()
        }
    }

    fn router(answer: Result<RawRoute, CollaboratorError>) -> CountingRouter {
        CountingRouter { answer, calls: Cell::new(0) }
    }

    fn a() -> Coordinate {
        Coordinate::new(19.0760, 72.8777)
    }

    fn b() -> Coordinate {
        Coordinate::new(19.0800, 72.8800)
    }

    #[test]
    fn lon_lat_pairs_are_swapped() {
        let raw = RawRoute::lon_lat(vec![[72.8777, 19.0760], [72.8800, 19.0800]]);
        let path = normalize_path(raw).unwrap();
        assert_eq!(path.points, vec![a(), b()]);
    }

    #[test]
    fn lat_lon_pairs_pass_through() {
        let raw = RawRoute::lat_lon(vec![[19.0760, 72.8777], [19.0800, 72.8800]]);
        assert_eq!(normalize_path(raw).unwrap().points, vec![a(), b()]);
    }

    #[test]
    fn swapped_axes_out_of_range_are_rejected() {
        // Mislabelled axes put 100.9 in the latitude slot
        let raw = RawRoute::lon_lat(vec![[19.0760, 100.8777], [19.08, 100.88]]);
        assert!(matches!(normalize_path(raw), Err(ExplorerError::RouteUnavailable { .. })));
    }

    #[test]
    fn empty_path_is_unavailable() {
        assert!(matches!(
            normalize_path(RawRoute::lon_lat(Vec::new())),
            Err(ExplorerError::RouteUnavailable { .. })
        ));
    }

    #[test]
    fn named_place_mode_never_calls_router() {
        let r = router(Ok(RawRoute::lat_lon(vec![[19.0760, 72.8777], [19.08, 72.88]])));
        assert_eq!(compute_route(&r, Mode::NamedPlaceActive, a(), b()), Ok(None));
        assert_eq!(compute_route(&r, Mode::Idle, a(), b()), Ok(None));
        assert_eq!(r.calls.get(), 0);
    }

    #[test]
    fn device_mode_returns_path() {
        let r = router(Ok(RawRoute::lon_lat(vec![[72.8777, 19.0760], [72.8800, 19.0800]])));
        let path = compute_route(&r, Mode::DeviceLocationActive, a(), b()).unwrap().unwrap();
        assert_eq!(path.len(), 2);
        assert!(path.length_km() > 0.0);
        assert_eq!(r.calls.get(), 1);
    }

    #[test]
    fn router_failure_is_route_unavailable() {
        let r = router(Err(CollaboratorError::Transport("timeout".into())));
        assert!(matches!(
            compute_route(&r, Mode::DeviceLocationActive, a(), b()),
            Err(ExplorerError::RouteUnavailable { .. })
        ));
    }
}
