//! Nominatim `/search?format=json` responses.

use serde::Deserialize;

use crate::data::poi::{Coordinate, PlaceMatch};
use crate::error::AdapterError;

#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, AdapterError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| AdapterError::InvalidNumber { field, value: value.to_string() })
}

impl NominatimPlace {
    pub fn to_match(&self) -> Result<PlaceMatch, AdapterError> {
        let lat = parse_number("lat", &self.lat)?;
        let lon = parse_number("lon", &self.lon)?;
        let coordinate = Coordinate::try_new(lat, lon).ok_or(AdapterError::CoordinateOutOfRange { lat, lon })?;
        Ok(PlaceMatch { coordinate, display_name: self.display_name.clone() })
    }
}

pub fn parse_places(places: &[NominatimPlace]) -> Result<Vec<PlaceMatch>, AdapterError> {
    places.iter().map(NominatimPlace::to_match).collect()
}

/// Nominatim reports coordinates as strings, in relevance order.
pub fn parse_search_response(json: &str) -> Result<Vec<PlaceMatch>, AdapterError> {
    let places: Vec<NominatimPlace> = serde_json::from_str(json)?;
    parse_places(&places)
}
