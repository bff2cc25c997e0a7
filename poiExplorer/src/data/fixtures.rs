//! Recorded service responses that stand in for the live collaborators.
//!
//! A fixture file holds raw Nominatim, Overpass and OSRM payloads keyed by
//! what was asked, plus the device position to report. Payloads go through
//! the same adapters as live responses, so a broken fixture fails at load
//! time rather than mid-session.

use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use serde::Deserialize;
use tracing::debug;

use crate::adapters::nominatim::{self, NominatimPlace};
use crate::adapters::osrm::OsrmResponse;
use crate::adapters::overpass::OverpassResponse;
use crate::data::poi::{Coordinate, PlaceMatch, RawPoi};
use crate::error::{CollaboratorError, FixtureError, GeolocationFailure};
use crate::geo::geo_math;
use crate::services::traits::{Geocoder, GeolocationProvider, PoiSource, RawRoute, RoutingService};

// Recorded destinations match a requested one within this distance
const ROUTE_MATCH_TOLERANCE_KM: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceKind {
    Geocoder,
    Pois,
    Router,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeviceFixture {
    Fixed { latitude: f64, longitude: f64 },
    Denied,
    #[default]
    Unavailable,
}

#[derive(Debug, Deserialize)]
pub struct RouteFixture {
    pub destination: Coordinate,
    pub response: OsrmResponse,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
pub struct FixtureFile {
    #[serde(default)]
    pub places: HashMap<String, Vec<NominatimPlace>>,
    #[serde(default)]
    pub device: DeviceFixture,
    #[serde(default)]
    pub pois: HashMap<String, OverpassResponse>,
    #[serde(default)]
    pub routes: Vec<RouteFixture>,
    /// Answer unrecorded destinations with a two-point straight line.
    #[serde(default = "default_true")]
    pub straight_line_routes: bool,
    #[serde(default)]
    pub unavailable: Vec<ServiceKind>,
}

#[derive(Debug, Clone)]
pub struct FixtureWorld {
    places: HashMap<String, Vec<PlaceMatch>>,
    device: DeviceFixture,
    pois: HashMap<String, Vec<RawPoi>>,
    routes: Vec<(Coordinate, RawRoute)>,
    straight_line_routes: bool,
    unavailable: Vec<ServiceKind>,
}

fn place_key(text: &str) -> String {
    text.trim().to_lowercase()
}

impl FixtureWorld {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, FixtureError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| FixtureError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let fixture: FixtureFile = serde_json::from_reader(BufReader::new(file))?;
        Self::from_fixture(fixture)
    }

    pub fn from_json_str(json: &str) -> Result<Self, FixtureError> {
        let fixture: FixtureFile = serde_json::from_str(json)?;
        Self::from_fixture(fixture)
    }

    pub fn from_fixture(fixture: FixtureFile) -> Result<Self, FixtureError> {
        let mut places = HashMap::new();
        for (name, recorded) in fixture.places {
            let matches = nominatim::parse_places(&recorded).map_err(|source| FixtureError::Payload {
                entry: format!("places.{}", name),
                source,
            })?;
            places.insert(place_key(&name), matches);
        }

        let mut pois = HashMap::new();
        for (category, response) in fixture.pois {
            let raw = response.to_raw_pois().map_err(|source| FixtureError::Payload {
                entry: format!("pois.{}", category),
                source,
            })?;
            pois.insert(category, raw);
        }

        let mut routes = Vec::with_capacity(fixture.routes.len());
        for (i, recorded) in fixture.routes.into_iter().enumerate() {
            let raw = recorded.response.into_raw_route().map_err(|source| FixtureError::Payload {
                entry: format!("routes[{}]", i),
                source,
            })?;
            routes.push((recorded.destination, raw));
        }

        debug!(places = places.len(), categories = pois.len(), routes = routes.len(), "fixture world loaded");
        Ok(Self {
            places,
            device: fixture.device,
            pois,
            routes,
            straight_line_routes: fixture.straight_line_routes,
            unavailable: fixture.unavailable,
        })
    }

    fn check_available(&self, service: ServiceKind) -> Result<(), CollaboratorError> {
        if self.unavailable.contains(&service) {
            return Err(CollaboratorError::Transport(format!("{:?} is offline in this fixture", service)));
        }
        Ok(())
    }
}

impl Geocoder for FixtureWorld {
    fn search(&self, text: &str) -> Result<Vec<PlaceMatch>, CollaboratorError> {
        self.check_available(ServiceKind::Geocoder)?;
        Ok(self.places.get(&place_key(text)).cloned().unwrap_or_default())
    }
}

impl PoiSource for FixtureWorld {
    /// Recorded POIs of the category that fall inside the radius.
    fn query_by_category_near(
        &self,
        center: Coordinate,
        category: &str,
        radius_meters: u32,
    ) -> Result<Vec<RawPoi>, CollaboratorError> {
        self.check_available(ServiceKind::Pois)?;
        let radius_km = f64::from(radius_meters) / 1000.0;
        Ok(self
            .pois
            .get(category)
            .map(|recorded| {
                recorded
                    .iter()
                    .filter(|poi| geo_math::distance_km(center, poi.coordinate) <= radius_km)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl GeolocationProvider for FixtureWorld {
    fn current_position(&self) -> Result<Coordinate, GeolocationFailure> {
        match &self.device {
            DeviceFixture::Fixed { latitude, longitude } => {
                Coordinate::try_new(*latitude, *longitude).ok_or(GeolocationFailure::Unavailable)
            }
            DeviceFixture::Denied => Err(GeolocationFailure::Denied),
            DeviceFixture::Unavailable => Err(GeolocationFailure::Unavailable),
        }
    }
}

impl RoutingService for FixtureWorld {
    fn route(&self, from: Coordinate, to: Coordinate) -> Result<RawRoute, CollaboratorError> {
        self.check_available(ServiceKind::Router)?;
        let recorded = self
            .routes
            .iter()
            .find(|(destination, _)| geo_math::distance_km(*destination, to) <= ROUTE_MATCH_TOLERANCE_KM);

        match recorded {
            Some((_, route)) => Ok(route.clone()),
            None if self.straight_line_routes => Ok(RawRoute::lon_lat(vec![
                [from.longitude, from.latitude],
                [to.longitude, to.latitude],
            ])),
            None => Err(CollaboratorError::Service { status: 400, message: "NoRoute".to_string() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::traits::AxisOrder;

    const WORLD: &str = r#"{
        "places": {
            "Delhi": [{"lat": "28.6139", "lon": "77.2090", "display_name": "Delhi, India"}]
        },
        "device": {"status": "fixed", "latitude": 28.6139, "longitude": 77.2090},
        "pois": {
            "restaurant": {"elements": [
                {"type": "node", "id": 1, "lat": 28.6200, "lon": 77.2090, "tags": {"name": "Near"}},
                {"type": "node", "id": 2, "lat": 29.6139, "lon": 77.2090, "tags": {"name": "Far"}}
            ]}
        },
        "routes": [
            {"destination": {"latitude": 28.62, "longitude": 77.209},
             "response": {"code": "Ok", "routes": [{"geometry": {"coordinates": [[77.209, 28.6139], [77.21, 28.617], [77.209, 28.62]]}}]}}
        ],
        "straight_line_routes": false
    }"#;

    #[test]
    fn geocoder_lookup_is_case_insensitive() {
        let world = FixtureWorld::from_json_str(WORLD).unwrap();
        assert_eq!(world.search(" delhi ").unwrap().len(), 1);
        assert!(world.search("Paris").unwrap().is_empty());
    }

    #[test]
    fn poi_source_honours_radius() {
        let world = FixtureWorld::from_json_str(WORLD).unwrap();
        let pois = world
            .query_by_category_near(Coordinate::new(28.6139, 77.2090), "restaurant", 10_000)
            .unwrap();
        assert_eq!(pois.len(), 1);
        assert_eq!(pois[0].name.as_deref(), Some("Near"));
        assert!(world.query_by_category_near(Coordinate::new(28.6139, 77.2090), "cafe", 10_000).unwrap().is_empty());
    }

    #[test]
    fn recorded_route_is_returned_and_unknown_fails() {
        let world = FixtureWorld::from_json_str(WORLD).unwrap();
        let from = Coordinate::new(28.6139, 77.2090);
        let route = world.route(from, Coordinate::new(28.62, 77.209)).unwrap();
        assert_eq!(route.axis_order, AxisOrder::LonLat);
        assert_eq!(route.points.len(), 3);
        assert!(world.route(from, Coordinate::new(10.0, 10.0)).is_err());
    }

    #[test]
    fn device_and_outages() {
        let world = FixtureWorld::from_json_str(r#"{"device": {"status": "denied"}, "unavailable": ["pois"]}"#).unwrap();
        assert_eq!(world.current_position(), Err(GeolocationFailure::Denied));
        assert!(matches!(
            world.query_by_category_near(Coordinate::new(0.0, 0.0), "cafe", 100),
            Err(CollaboratorError::Transport(_))
        ));
    }

    #[test]
    fn bad_payload_names_the_entry() {
        let json = r#"{"places": {"X": [{"lat": "nope", "lon": "1"}]}}"#;
        match FixtureWorld::from_json_str(json) {
            Err(FixtureError::Payload { entry, .. }) => assert_eq!(entry, "places.X"),
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }
    }
}
