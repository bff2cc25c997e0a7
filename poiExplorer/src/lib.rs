// Main module declarations for the POI explorer

// Coordinator state machine
pub mod core {
    pub mod coordinator;
    pub mod generation;
    pub mod state;
}

// Configuration modules
pub mod config {
    pub mod constants;
    pub mod explorer_config;
}

// Geographic math
pub mod geo {
    pub mod bounds;
    pub mod geo_math;
}

// Model definitions and offline data
pub mod data {
    pub mod fixtures;
    pub mod poi;
}

// Stateless services the coordinator drives
pub mod services {
    pub mod anchor_resolver;
    pub mod proximity_search;
    pub mod route_overlay;
    pub mod traits;
}

// Wire format parsers for the public OSM services
pub mod adapters {
    pub mod nominatim;
    pub mod osrm;
    pub mod overpass;
}

// Utility functions
pub mod utils {
    pub mod csv_export;
    pub mod logging;
}

// CLI interface
pub mod cli {
    pub mod cli;
}

pub mod error;

// Re-export commonly used items
pub use crate::core::coordinator::{Services, ViewCoordinator};
pub use crate::core::state::{Mode, Snapshot};
pub use crate::data::poi::{Coordinate, PoiRecord};
pub use crate::error::ExplorerError;
