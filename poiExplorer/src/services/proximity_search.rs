//! POI query around an anchor, plus the filter/rank step every answer goes through.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::constants::{OVERPASS_TAG_KEY, OVERPASS_TIMEOUT_SECS, UNNAMED_POI_NAME};
use crate::data::poi::{Coordinate, PoiRecord, RawPoi};
use crate::error::{CollaboratorError, ExplorerError};
use crate::geo::geo_math;
use crate::services::traits::PoiSource;
use crate::utils::logging::{self, OperationCategory};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoiQuery {
    pub center: Coordinate,
    pub category: String,
    pub radius_meters: u32,
}

impl PoiQuery {
    pub fn new(center: Coordinate, category: &str, radius_meters: u32) -> Result<Self, ExplorerError> {
        Ok(Self {
            center,
            category: validate_category(category)?.to_string(),
            radius_meters,
        })
    }

    /// Overpass QL for every node tagged with the category inside the radius.
    pub fn to_overpass_ql(&self) -> String {
        format!(
            "[out:json][timeout:{}];\n(\n  node[\"{}\"=\"{}\"](around:{}, {}, {});\n);\nout;\n",
            OVERPASS_TIMEOUT_SECS,
            OVERPASS_TAG_KEY,
            self.category,
            self.radius_meters,
            self.center.latitude,
            self.center.longitude,
        )
    }
}

/// Categories are spliced into a query string, so quoting characters are refused.
pub fn validate_category(category: &str) -> Result<&str, ExplorerError> {
    let trimmed = category.trim();
    let bad_char = trimmed.chars().any(|c| matches!(c, '"' | '\\' | '\n' | '\r' | '[' | ']'));
    if trimmed.is_empty() || bad_char {
        return Err(ExplorerError::InvalidCategory { category: category.to_string() });
    }
    Ok(trimmed)
}

/// Ranked answer to one query. Order drives both the list and the markers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultSet {
    pub anchor: Coordinate,
    pub category: String,
    pub records: Vec<PoiRecord>,
}

impl SearchResultSet {
    pub fn empty(anchor: Coordinate, category: &str) -> Self {
        Self { anchor, category: category.to_string(), records: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PoiRecord> {
        self.records.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PoiRecord> {
        self.records.iter()
    }

    pub fn is_sorted_by_distance(&self) -> bool {
        self.records.windows(2).all(|w| w[0].distance_km <= w[1].distance_km)
    }
}

fn usable_name(name: Option<&str>) -> Option<&str> {
    let name = name?.trim();
    if name.is_empty() || name.to_lowercase() == UNNAMED_POI_NAME {
        None
    } else {
        Some(name)
    }
}

/// Drops unnamed POIs, measures each from the anchor and sorts nearest first.
/// The sort is stable, so equal distances keep source order.
pub fn rank(anchor: Coordinate, category: &str, raw: Vec<RawPoi>) -> SearchResultSet {
    let _timing = logging::start_timing("rank", OperationCategory::Ranking);

    let total = raw.len();
    let mut records: Vec<PoiRecord> = raw
        .into_iter()
        .filter_map(|poi| {
            let name = usable_name(poi.name.as_deref())?.to_string();
            let distance = geo_math::distance_km(anchor, poi.coordinate);
            Some(PoiRecord::new(poi.coordinate, name, distance))
        })
        .collect();

    records.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));

    debug!(total, kept = records.len(), category, "ranked POIs");
    SearchResultSet { anchor, category: category.to_string(), records }
}

/// Folds a POI service answer into a result set or a user-facing error.
pub fn results_from_response(
    query: &PoiQuery,
    response: Result<Vec<RawPoi>, CollaboratorError>,
) -> Result<SearchResultSet, ExplorerError> {
    let raw = response.map_err(|e| {
        warn!(error = %e, category = %query.category, "POI query failed");
        ExplorerError::SearchUnavailable { reason: e.to_string() }
    })?;

    let no_results = || ExplorerError::NoResultsForCategory { category: query.category.clone() };
    if raw.is_empty() {
        return Err(no_results());
    }

    let results = rank(query.center, &query.category, raw);
    if results.is_empty() {
        return Err(no_results());
    }
    Ok(results)
}

pub fn query(source: &dyn PoiSource, query: &PoiQuery) -> Result<SearchResultSet, ExplorerError> {
    let _timing = logging::start_timing("proximity_query", OperationCategory::PoiQuery);

    info!(
        category = %query.category,
        radius_m = query.radius_meters,
        lat = query.center.latitude,
        lon = query.center.longitude,
        "querying nearby POIs"
    );
    debug!(ql = %query.to_overpass_ql(), "equivalent Overpass query");
    let response = source.query_by_category_near(query.center, &query.category, query.radius_meters);
    results_from_response(query, response)
}
