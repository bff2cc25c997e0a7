use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::config::constants::{
    ANCHOR_ZOOM, DEFAULT_CATEGORY, DEFAULT_SEARCH_RADIUS_METERS, DEFAULT_VIEW_LATITUDE,
    DEFAULT_VIEW_LONGITUDE, DEFAULT_VIEW_ZOOM, FIT_PADDING_PX, MAX_SEARCH_RADIUS_METERS, MAX_ZOOM,
    RESULT_ZOOM,
};
use crate::data::poi::Coordinate;
use crate::error::ConfigError;
use crate::services::proximity_search::validate_category;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewDefaults {
    pub center: Coordinate,
    pub zoom: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ExplorerConfig {
    pub search_radius_meters: u32,
    pub default_category: String,
    pub anchor_zoom: u8,          // Zoom used when centring on a fresh anchor
    pub result_zoom: u8,          // Zoom used when centring on a selected POI
    pub fit_padding_px: u32,      // Margin kept around fitted bounds
    pub initial_view: ViewDefaults,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            search_radius_meters: DEFAULT_SEARCH_RADIUS_METERS,
            default_category: DEFAULT_CATEGORY.to_string(),
            anchor_zoom: ANCHOR_ZOOM,
            result_zoom: RESULT_ZOOM,
            fit_padding_px: FIT_PADDING_PX,
            initial_view: ViewDefaults {
                center: Coordinate::new(DEFAULT_VIEW_LATITUDE, DEFAULT_VIEW_LONGITUDE),
                zoom: DEFAULT_VIEW_ZOOM,
            },
        }
    }
}

impl ExplorerConfig {
    /// Loads a config file. Missing fields fall back to the defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: ExplorerConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search_radius_meters == 0 || self.search_radius_meters > MAX_SEARCH_RADIUS_METERS {
            return Err(ConfigError::Invalid {
                field: "search_radius_meters",
                reason: format!(
                    "must be between 1 and {}, got {}",
                    MAX_SEARCH_RADIUS_METERS, self.search_radius_meters
                ),
            });
        }
        if let Err(err) = validate_category(&self.default_category) {
            return Err(ConfigError::Invalid {
                field: "default_category",
                reason: err.to_string(),
            });
        }
        for (field, zoom) in [
            ("anchor_zoom", self.anchor_zoom),
            ("result_zoom", self.result_zoom),
            ("initial_view.zoom", self.initial_view.zoom),
        ] {
            if zoom > MAX_ZOOM {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("zoom {} exceeds maximum {}", zoom, MAX_ZOOM),
                });
            }
        }
        Ok(())
    }
}
