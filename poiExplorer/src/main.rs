use anyhow::{Context, Result};
use clap::Parser;
use tracing::warn;

use poi_explorer::cli::cli::Args;
use poi_explorer::config::explorer_config::ExplorerConfig;
use poi_explorer::core::coordinator::{Services, ViewCoordinator};
use poi_explorer::core::state::{Snapshot, Viewport};
use poi_explorer::data::fixtures::FixtureWorld;
use poi_explorer::error::ExplorerError;
use poi_explorer::geo::geo_math;
use poi_explorer::utils::csv_export::CsvExporter;
use poi_explorer::utils::logging::{self, OperationCategory};

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    logging::init_logging(args.enable_timing(), args.debug_logging())
        .context("failed to install tracing subscriber")?;

    let config = match args.config() {
        Some(path) => ExplorerConfig::from_json_file(path)
            .with_context(|| format!("failed to load config from {}", path))?,
        None => ExplorerConfig::default(),
    };

    let world = {
        let _timing = logging::start_timing("load_world", OperationCategory::FileIO);
        FixtureWorld::from_json_file(args.world())
            .with_context(|| format!("failed to load fixture world from {}", args.world()))?
    };
    let services = Services::from_world(&world);
    let mut coordinator = ViewCoordinator::new(config);

    run_session(&mut coordinator, &services, &args);

    let snapshot = coordinator.snapshot();
    if args.json() {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print_snapshot(&snapshot);
    }

    if let Some(dir) = args.csv_dir() {
        let exporter = CsvExporter::new(dir).with_context(|| format!("failed to create export directory under {}", dir))?;
        if let Some(results) = coordinator.results() {
            let path = exporter.export_results(results)?;
            println!("📄 Results written to {}", path.display());
        }
        if let Some(route) = coordinator.route() {
            let path = exporter.export_route(&route.path)?;
            println!("📄 Route written to {}", path.display());
        }
    }

    logging::print_timing_report();
    Ok(())
}

/// Drives the requested steps in order. A failed step is logged and the
/// session carries on; later steps only need an anchor to be in place.
fn run_session(coordinator: &mut ViewCoordinator, services: &Services<'_>, args: &Args) {
    if let Some(category) = args.category() {
        // Recorded only; there is no anchor yet
        report(coordinator.change_category(services, category));
    }

    match args.place() {
        Some(place) => report(coordinator.submit_named_search(services, place)),
        None => report(coordinator.request_device_location(services)),
    }

    if coordinator.mode().has_anchor() {
        if let Some(category) = args.switch_category() {
            report(coordinator.change_category(services, category));
        }
        if let Some(index) = args.select() {
            report(coordinator.select_result(services, index));
        }
    }
}

fn report<T>(outcome: Result<T, ExplorerError>) {
    if let Err(err) = outcome {
        warn!(error = %err, "step failed");
    }
}

fn print_snapshot(snapshot: &Snapshot) {
    println!("Mode: {:?}   Category: {}", snapshot.mode, snapshot.category);
    if let Some(status) = snapshot.activity.status_text() {
        println!("{}", status);
    }

    if let Some(marker) = &snapshot.anchor_marker {
        println!(
            "📍 {} ({:.4}, {:.4})",
            marker.label, marker.coordinate.latitude, marker.coordinate.longitude
        );
    }

    if let Some(notice) = &snapshot.notice {
        println!("⚠️  {}", notice.message);
    }

    for (i, label) in snapshot.list_labels().iter().enumerate() {
        let marker = match &snapshot.selected {
            Some(selection) if selection.index == i => "▶",
            _ => " ",
        };
        println!("{} {:>2}. {}", marker, i, label);
    }

    if let Some(route) = &snapshot.route {
        println!(
            "🚗 Route: {} points, {:.2} km",
            route.len(),
            geo_math::path_length_km(route)
        );
    }

    match snapshot.viewport {
        Viewport::Centered { center, zoom } => {
            println!("🗺️  View centred on ({:.4}, {:.4}) at zoom {}", center.latitude, center.longitude, zoom)
        }
        Viewport::Fitted { bounds, padding_px } => println!(
            "🗺️  View fitted to [{:.4}, {:.4}] - [{:.4}, {:.4}] with {}px padding",
            bounds.south, bounds.west, bounds.north, bounds.east, padding_px
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use poi_explorer::core::state::Mode;

    fn delhi_world() -> FixtureWorld {
        FixtureWorld::from_json_str(include_str!("../assets/delhi_world.json")).unwrap()
    }

    #[test]
    fn switch_category_runs_after_empty_first_search() {
        let args = Args::try_parse_from([
            "poi-explorer", "--place", "Mumbai", "-k", "hospital", "--switch-category", "restaurant",
        ])
        .unwrap();
        let world = delhi_world();
        let services = Services::from_world(&world);
        let mut coordinator = ViewCoordinator::default();

        run_session(&mut coordinator, &services, &args);

        assert_eq!(coordinator.mode(), Mode::NamedPlaceActive);
        assert_eq!(coordinator.category(), "restaurant");
        let results = coordinator.results().unwrap();
        assert_eq!(results.iter().next().unwrap().name, "Kurla Canteen");
    }

    #[test]
    fn unknown_place_skips_later_steps() {
        let args = Args::try_parse_from([
            "poi-explorer", "--place", "Atlantis", "--switch-category", "cafe", "--select", "0",
        ])
        .unwrap();
        let world = delhi_world();
        let services = Services::from_world(&world);
        let mut coordinator = ViewCoordinator::default();

        run_session(&mut coordinator, &services, &args);

        assert_eq!(coordinator.mode(), Mode::Idle);
        assert!(coordinator.results().is_none());
        assert!(coordinator.route().is_none());
    }
}
