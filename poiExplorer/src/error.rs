//! Error types for the explorer.
//!
//! `ExplorerError` is the user-facing taxonomy: every variant is recoverable
//! and maps to a distinct message. The collaborator-level errors below it
//! describe what went wrong at a service boundary and are folded into the
//! taxonomy by the services.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recoverable conditions surfaced to the user.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ExplorerError {
    #[error("no search text given")]
    EmptyInput,

    #[error("no place matches {query:?}")]
    NotFound { query: String },

    #[error("geocoding service unavailable: {reason}")]
    GeocodingUnavailable { reason: String },

    #[error("device location unavailable: {reason}")]
    PermissionDenied { reason: String },

    #[error("POI search unavailable: {reason}")]
    SearchUnavailable { reason: String },

    #[error("no {category} found nearby")]
    NoResultsForCategory { category: String },

    #[error("invalid category {category:?}")]
    InvalidCategory { category: String },

    #[error("route unavailable: {reason}")]
    RouteUnavailable { reason: String },

    #[error("no result at index {index} (have {len})")]
    UnknownResult { index: usize, len: usize },
}

/// Serializable discriminant of [`ExplorerError`], carried in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    EmptyInput,
    NotFound,
    GeocodingUnavailable,
    PermissionDenied,
    SearchUnavailable,
    NoResultsForCategory,
    InvalidCategory,
    RouteUnavailable,
    UnknownResult,
}

impl ExplorerError {
    pub fn kind(&self) -> NoticeKind {
        match self {
            ExplorerError::EmptyInput => NoticeKind::EmptyInput,
            ExplorerError::NotFound { .. } => NoticeKind::NotFound,
            ExplorerError::GeocodingUnavailable { .. } => NoticeKind::GeocodingUnavailable,
            ExplorerError::PermissionDenied { .. } => NoticeKind::PermissionDenied,
            ExplorerError::SearchUnavailable { .. } => NoticeKind::SearchUnavailable,
            ExplorerError::NoResultsForCategory { .. } => NoticeKind::NoResultsForCategory,
            ExplorerError::InvalidCategory { .. } => NoticeKind::InvalidCategory,
            ExplorerError::RouteUnavailable { .. } => NoticeKind::RouteUnavailable,
            ExplorerError::UnknownResult { .. } => NoticeKind::UnknownResult,
        }
    }

    /// Text shown to the user. Each kind reads differently so the UI never
    /// confuses a transport failure with an empty category.
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::EmptyInput => "Please enter a place!".to_string(),
            ExplorerError::NotFound { .. } => "Place not found.".to_string(),
            ExplorerError::GeocodingUnavailable { .. } => {
                "Place lookup is unavailable right now. Please try again.".to_string()
            }
            ExplorerError::PermissionDenied { .. } => "Location access denied!".to_string(),
            ExplorerError::SearchUnavailable { .. } => {
                "Nearby search is unavailable right now. Please try again.".to_string()
            }
            ExplorerError::NoResultsForCategory { category } => {
                format!("No {}s found nearby.", category)
            }
            ExplorerError::InvalidCategory { category } => {
                format!("\"{}\" is not a valid category.", category)
            }
            ExplorerError::RouteUnavailable { .. } => {
                "No driving route could be found to this place.".to_string()
            }
            ExplorerError::UnknownResult { .. } => "That result is no longer available.".to_string(),
        }
    }
}

/// Failure reported by a geocoding, POI or routing collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CollaboratorError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("service responded with status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Why a geolocation fix could not be obtained.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeolocationFailure {
    #[error("permission denied")]
    Denied,

    #[error("position unavailable")]
    Unavailable,

    #[error("timed out waiting for a fix")]
    Timeout,
}

/// Errors decoding a service payload.
#[derive(Error, Debug)]
pub enum AdapterError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid number {value:?} in field {field}")]
    InvalidNumber { field: &'static str, value: String },

    #[error("coordinate out of range: ({lat}, {lon})")]
    CoordinateOutOfRange { lat: f64, lon: f64 },

    #[error("service reported {code}: {message}")]
    ServiceCode { code: String, message: String },
}

impl From<AdapterError> for CollaboratorError {
    fn from(err: AdapterError) -> Self {
        match err {
            AdapterError::ServiceCode { code, message } => {
                CollaboratorError::Malformed(format!("{}: {}", code, message))
            }
            other => CollaboratorError::Malformed(other.to_string()),
        }
    }
}

/// Errors loading a recorded service world from disk.
#[derive(Error, Debug)]
pub enum FixtureError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid fixture JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("fixture entry {entry}: {source}")]
    Payload {
        entry: String,
        #[source]
        source: AdapterError,
    },
}

/// Errors loading an explorer configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Errors writing CSV exports.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
