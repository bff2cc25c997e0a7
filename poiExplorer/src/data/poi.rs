use serde::{Deserialize, Serialize};
use crate::config::constants::{DISTANCE_DECIMALS, MAX_LATITUDE, MAX_LONGITUDE};
use crate::geo::geo_math;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    /// Builds a coordinate, clamping latitude and wrapping longitude into range.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        let latitude = latitude.clamp(-MAX_LATITUDE, MAX_LATITUDE);
        let longitude = if (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
            longitude
        } else {
            (longitude + MAX_LONGITUDE).rem_euclid(2.0 * MAX_LONGITUDE) - MAX_LONGITUDE
        };
        Self { latitude, longitude }
    }

    /// Strict constructor for values arriving from outside the crate.
    pub fn try_new(latitude: f64, longitude: f64) -> Option<Self> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude)
            && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude);
        valid.then_some(Self { latitude, longitude })
    }

    pub fn distance_to(&self, other: &Coordinate) -> f64 {
        geo_math::distance_km(*self, *other)
    }
}

pub trait POI {
    fn get_coordinate(&self) -> &Coordinate;
    fn get_name(&self) -> &str;
}

/// A POI as the query service returns it; the name may be missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoi {
    pub coordinate: Coordinate,
    pub name: Option<String>,
}

impl RawPoi {
    pub fn new(coordinate: Coordinate, name: Option<&str>) -> Self {
        Self { coordinate, name: name.map(str::to_string) }
    }
}

/// A named POI ranked by its distance from the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiRecord {
    pub coordinate: Coordinate,
    pub name: String,
    pub distance_km: f64,
}

impl PoiRecord {
    pub fn new(coordinate: Coordinate, name: String, distance_km: f64) -> Self {
        Self { coordinate, name, distance_km }
    }

    pub fn formatted_distance(&self) -> String {
        format!("{:.*} km away", DISTANCE_DECIMALS, self.distance_km)
    }

    /// Text for the result list entry and the marker popup.
    pub fn list_label(&self) -> String {
        format!("{} – {}", self.name, self.formatted_distance())
    }
}

impl POI for PoiRecord {
    fn get_coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    fn get_name(&self) -> &str {
        &self.name
    }
}

/// A geocoder hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceMatch {
    pub coordinate: Coordinate,
    pub display_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_clamps_latitude_and_wraps_longitude() {
        let c = Coordinate::new(95.0, 190.0);
        assert_eq!(c.latitude, 90.0);
        assert!((c.longitude - -170.0).abs() < 1e-9);

        let c = Coordinate::new(-91.0, -181.0);
        assert_eq!(c.latitude, -90.0);
        assert!((c.longitude - 179.0).abs() < 1e-9);
    }

    #[test]
    fn new_keeps_boundary_longitudes() {
        assert_eq!(Coordinate::new(0.0, 180.0).longitude, 180.0);
        assert_eq!(Coordinate::new(0.0, -180.0).longitude, -180.0);
    }

    #[test]
    fn try_new_rejects_out_of_range() {
        assert!(Coordinate::try_new(28.6, 77.2).is_some());
        assert!(Coordinate::try_new(91.0, 0.0).is_none());
        assert!(Coordinate::try_new(0.0, 180.5).is_none());
        assert!(Coordinate::try_new(f64::NAN, 0.0).is_none());
    }

    #[test]
    fn list_label_formats_two_decimals() {
        let record = PoiRecord::new(Coordinate::new(0.0, 0.0), "Karim's".into(), 1.0);
        assert_eq!(record.list_label(), "Karim's – 1.00 km away");
    }
}
