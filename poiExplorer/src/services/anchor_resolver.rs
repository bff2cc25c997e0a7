//! Turns a place name or a geolocation fix into the single active anchor.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::constants::DEVICE_LOCATION_LABEL;
use crate::data::poi::{Coordinate, PlaceMatch, POI};
use crate::error::{CollaboratorError, ExplorerError, GeolocationFailure};
use crate::services::traits::{Geocoder, GeolocationProvider};
use crate::utils::logging::{self, OperationCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provenance {
    NamedPlace,
    DeviceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub coordinate: Coordinate,
    pub provenance: Provenance,
    pub label: String,
}

impl POI for Anchor {
    fn get_coordinate(&self) -> &Coordinate {
        &self.coordinate
    }

    fn get_name(&self) -> &str {
        &self.label
    }
}

/// Rejects blank input before anything reaches the geocoder.
pub fn validate_query(query: &str) -> Result<&str, ExplorerError> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(ExplorerError::EmptyInput);
    }
    Ok(trimmed)
}

/// Builds a named-place anchor from a geocoder answer. The label is the
/// user's own text, not the geocoder's display name.
pub fn anchor_from_matches(
    original_text: &str,
    matches: Result<Vec<PlaceMatch>, CollaboratorError>,
) -> Result<Anchor, ExplorerError> {
    let matches = matches.map_err(|e| ExplorerError::GeocodingUnavailable { reason: e.to_string() })?;
    let first = matches.into_iter().next().ok_or_else(|| ExplorerError::NotFound {
        query: original_text.to_string(),
    })?;

    debug!(query = original_text, display_name = %first.display_name, "geocoder matched place");
    Ok(Anchor {
        coordinate: first.coordinate,
        provenance: Provenance::NamedPlace,
        label: original_text.to_string(),
    })
}

pub fn anchor_from_fix(fix: Result<Coordinate, GeolocationFailure>) -> Result<Anchor, ExplorerError> {
    match fix {
        Ok(coordinate) => Ok(Anchor {
            coordinate,
            provenance: Provenance::DeviceLocation,
            label: DEVICE_LOCATION_LABEL.to_string(),
        }),
        Err(failure) => {
            warn!(%failure, "geolocation fix failed");
            Err(ExplorerError::PermissionDenied { reason: failure.to_string() })
        }
    }
}

pub fn resolve_by_name(geocoder: &dyn Geocoder, query: &str) -> Result<Anchor, ExplorerError> {
    let _timing = logging::start_timing("resolve_by_name", OperationCategory::Geocoding);

    let trimmed = validate_query(query)?;
    info!(query = trimmed, "resolving place name");
    anchor_from_matches(query, geocoder.search(trimmed))
}

pub fn resolve_by_device_location(provider: &dyn GeolocationProvider) -> Result<Anchor, ExplorerError> {
    let _timing = logging::start_timing("resolve_by_device_location", OperationCategory::Geolocation);

    info!("requesting device position");
    anchor_from_fix(provider.current_position())
}
