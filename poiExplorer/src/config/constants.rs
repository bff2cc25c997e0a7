// Geodesy Constants
pub const EARTH_RADIUS_KM: f64 = 6371.0;
pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

// Search Constants
pub const DEFAULT_SEARCH_RADIUS_METERS: u32 = 10_000;
pub const MAX_SEARCH_RADIUS_METERS: u32 = 50_000;    // Overpass rejects much larger around() filters
pub const DEFAULT_CATEGORY: &str = "restaurant";
pub const UNNAMED_POI_NAME: &str = "unnamed";
pub const OVERPASS_TIMEOUT_SECS: u32 = 25;
pub const OVERPASS_TAG_KEY: &str = "amenity";

// Map View Constants
pub const DEFAULT_VIEW_LATITUDE: f64 = 20.5937;       // Centre of India
pub const DEFAULT_VIEW_LONGITUDE: f64 = 78.9629;
pub const DEFAULT_VIEW_ZOOM: u8 = 5;
pub const ANCHOR_ZOOM: u8 = 14;                      // "close" zoom after locating an anchor
pub const RESULT_ZOOM: u8 = 16;                      // close-up zoom on a selected POI
pub const FIT_PADDING_PX: u32 = 50;
pub const MAX_ZOOM: u8 = 19;

// Labels
pub const DEVICE_LOCATION_LABEL: &str = "You are here";
pub const DISTANCE_DECIMALS: usize = 2;

// Floating point tolerance used when comparing coordinates
pub const COORDINATE_EPSILON: f64 = 1e-9;
