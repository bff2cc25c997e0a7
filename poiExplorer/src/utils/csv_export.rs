use std::fs;
use std::path::{Path, PathBuf};
use chrono::Local;
use serde::Serialize;
use tracing::info;

use crate::data::poi::POI;
use crate::error::ExportError;
use crate::services::proximity_search::SearchResultSet;
use crate::services::route_overlay::RoutePath;
use crate::utils::logging::{self, OperationCategory};

#[derive(Debug, Serialize)]
struct ResultRow<'a> {
    rank: usize,
    name: &'a str,
    latitude: f64,
    longitude: f64,
    distance_km: f64,
    category: &'a str,
}

#[derive(Debug, Serialize)]
struct RoutePointRow {
    sequence: usize,
    latitude: f64,
    longitude: f64,
    cumulative_km: f64,
}

/// Writes search results and route geometry into a timestamped directory.
pub struct CsvExporter {
    output_dir: PathBuf,
}

impl CsvExporter {
    /// Creates `<output_dir>/<YYYYmmdd_HHMMSS>/`.
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ExportError> {
        let timestamp = Local::now().format("%Y%m%d_%H%M%S").to_string();
        let full_path = output_dir.as_ref().join(timestamp);
        fs::create_dir_all(&full_path)?;
        Ok(Self { output_dir: full_path })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Rows are written in result order, so rank 1 is the nearest POI.
    pub fn export_results(&self, results: &SearchResultSet) -> Result<PathBuf, ExportError> {
        let _timing = logging::start_timing("export_results", OperationCategory::FileIO);

        let slug: String = results
            .category
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let path = self.output_dir.join(format!("results_{}.csv", slug));
        let mut writer = csv::Writer::from_path(&path)?;
        for (i, record) in results.iter().enumerate() {
            let coordinate = record.get_coordinate();
            writer.serialize(ResultRow {
                rank: i + 1,
                name: record.get_name(),
                latitude: coordinate.latitude,
                longitude: coordinate.longitude,
                distance_km: record.distance_km,
                category: &results.category,
            })?;
        }
        writer.flush()?;

        info!(path = %path.display(), rows = results.len(), "exported results");
        Ok(path)
    }

    pub fn export_route(&self, route: &RoutePath) -> Result<PathBuf, ExportError> {
        let _timing = logging::start_timing("export_route", OperationCategory::FileIO);

        let path = self.output_dir.join("route.csv");
        let mut writer = csv::Writer::from_path(&path)?;
        let mut cumulative_km = 0.0;
        for (i, point) in route.points.iter().enumerate() {
            if i > 0 {
                cumulative_km += point.distance_to(&route.points[i - 1]);
            }
            writer.serialize(RoutePointRow {
                sequence: i,
                latitude: point.latitude,
                longitude: point.longitude,
                cumulative_km,
            })?;
        }
        writer.flush()?;

        info!(path = %path.display(), points = route.len(), "exported route");
        Ok(path)
    }
}
