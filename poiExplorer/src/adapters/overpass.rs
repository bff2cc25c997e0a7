//! Overpass API `[out:json]` responses.

use std::collections::HashMap;
use serde::Deserialize;

use crate::data::poi::{Coordinate, RawPoi};
use crate::error::AdapterError;

#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
    #[serde(default)]
    pub remark: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OverpassElement {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub id: u64,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    #[serde(default)]
    pub tags: HashMap<String, String>,
}

impl OverpassResponse {
    /// Node elements as raw POIs, in response order. Elements without a
    /// position (ways or relations queried without `out center`) are skipped.
    pub fn to_raw_pois(&self) -> Result<Vec<RawPoi>, AdapterError> {
        // Overpass reports runtime errors in "remark" next to partial output
        if let Some(remark) = self.remark.as_deref().filter(|r| r.contains("error")) {
            return Err(AdapterError::ServiceCode { code: "remark".to_string(), message: remark.to_string() });
        }

        let mut pois = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            let (Some(lat), Some(lon)) = (element.lat, element.lon) else {
                continue;
            };
            let coordinate = Coordinate::try_new(lat, lon).ok_or(AdapterError::CoordinateOutOfRange { lat, lon })?;
            pois.push(RawPoi { coordinate, name: element.tags.get("name").cloned() });
        }
        Ok(pois)
    }
}

pub fn parse_elements(json: &str) -> Result<Vec<RawPoi>, AdapterError> {
    let response: OverpassResponse = serde_json::from_str(json)?;
    response.to_raw_pois()
}
