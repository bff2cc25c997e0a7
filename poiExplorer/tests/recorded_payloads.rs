// Raw service payloads pushed through the adapters and into the services.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use poi_explorer::adapters::{nominatim, osrm, overpass};
use poi_explorer::data::poi::Coordinate;
use poi_explorer::error::{CollaboratorError, ExplorerError};
use poi_explorer::geo::geo_math;
use poi_explorer::services::anchor_resolver::{self, Provenance};
use poi_explorer::services::proximity_search::{self, PoiQuery};
use poi_explorer::services::route_overlay;

#[test]
fn first_nominatim_match_becomes_anchor() {
    let json = r#"[
        {"place_id": 1, "lat": "28.6138954", "lon": "77.2090057", "display_name": "New Delhi, Delhi, India"},
        {"place_id": 2, "lat": "28.6517178", "lon": "77.2219388", "display_name": "Delhi, India"}
    ]"#;

    let matches = nominatim::parse_search_response(json).map_err(CollaboratorError::from);
    let anchor = anchor_resolver::anchor_from_matches("delhi", matches).unwrap();

    assert_eq!(anchor.provenance, Provenance::NamedPlace);
    assert_eq!(anchor.label, "delhi");
    assert_eq!(anchor.coordinate, Coordinate::new(28.6138954, 77.2090057));
}

#[test]
fn empty_nominatim_answer_is_not_found() {
    let matches = nominatim::parse_search_response("[]").map_err(CollaboratorError::from);
    assert_eq!(
        anchor_resolver::anchor_from_matches("Atlantis", matches),
        Err(ExplorerError::NotFound { query: "Atlantis".to_string() })
    );
}

#[test]
fn malformed_nominatim_answer_is_a_geocoding_failure() {
    let matches = nominatim::parse_search_response(r#"{"error": "rate limited"}"#).map_err(CollaboratorError::from);
    let err = anchor_resolver::anchor_from_matches("Delhi", matches).unwrap_err();
    assert!(matches!(err, ExplorerError::GeocodingUnavailable { .. }));
}

#[test]
fn overpass_elements_are_ranked_and_unnamed_dropped() {
    let json = r#"{
        "elements": [
            {"type": "node", "id": 10, "lat": 28.6562, "lon": 77.2303, "tags": {"amenity": "restaurant", "name": "Karim's"}},
            {"type": "node", "id": 11, "lat": 28.6304, "lon": 77.2177, "tags": {"amenity": "restaurant", "name": "Saravana Bhavan"}},
            {"type": "node", "id": 13, "lat": 28.6305, "lon": 77.2170, "tags": {"amenity": "restaurant", "name": "Unnamed"}},
            {"type": "node", "id": 14, "lat": 28.6306, "lon": 77.2171, "tags": {"amenity": "restaurant"}},
            {"type": "way", "id": 12, "tags": {"amenity": "restaurant", "name": "No Centre"}}
        ]
    }"#;
    let anchor = Coordinate::new(28.6315, 77.2167);
    let query = PoiQuery::new(anchor, "restaurant", 10_000).unwrap();

    let raw = overpass::parse_elements(json).map_err(CollaboratorError::from);
    let results = proximity_search::results_from_response(&query, raw).unwrap();

    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Saravana Bhavan", "Karim's"]);
    assert!(results.is_sorted_by_distance());
}

#[test]
fn overpass_runtime_error_is_search_failure_not_empty() {
    let json = r#"{"elements": [], "remark": "runtime error: Query timed out in \"query\" at line 1 after 25 seconds."}"#;
    let query = PoiQuery::new(Coordinate::new(0.0, 0.0), "cafe", 10_000).unwrap();

    let raw = overpass::parse_elements(json).map_err(CollaboratorError::from);
    let err = proximity_search::results_from_response(&query, raw).unwrap_err();
    assert!(matches!(err, ExplorerError::SearchUnavailable { .. }));
}

#[test]
fn osrm_geometry_is_normalized_to_lat_lon() {
    let json = r#"{
        "code": "Ok",
        "routes": [{
            "distance": 1203.5,
            "duration": 180.2,
            "geometry": {"type": "LineString", "coordinates": [[72.8777, 19.0760], [72.8790, 19.0781], [72.8800, 19.0800]]}
        }],
        "waypoints": []
    }"#;

    let raw = osrm::parse_route_response(json).map_err(CollaboratorError::from);
    let path = route_overlay::path_from_response(raw).unwrap();

    assert_eq!(path.points.first(), Some(&Coordinate::new(19.0760, 72.8777)));
    assert_eq!(path.points.last(), Some(&Coordinate::new(19.0800, 72.8800)));
    assert!(path.length_km() > 0.4 && path.length_km() < 0.6);
}

#[test]
fn osrm_no_route_is_route_unavailable() {
    let json = r#"{"code": "NoRoute", "message": "Impossible route between points", "routes": []}"#;
    let raw = osrm::parse_route_response(json).map_err(CollaboratorError::from);
    let err = route_overlay::path_from_response(raw).unwrap_err();
    assert!(matches!(err, ExplorerError::RouteUnavailable { .. }));
}

#[test]
fn ranking_random_payloads_is_ordered_and_complete() {
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..20 {
        let anchor = Coordinate::new(rng.gen_range(-60.0..60.0), rng.gen_range(-170.0..170.0));
        let count: usize = rng.gen_range(1..40);
        let mut named = 0;
        let elements: Vec<String> = (0..count)
            .map(|i| {
                let lat = anchor.latitude + rng.gen_range(-0.05..0.05);
                let lon = anchor.longitude + rng.gen_range(-0.05..0.05);
                if rng.gen_bool(0.3) {
                    format!(r#"{{"type": "node", "id": {}, "lat": {}, "lon": {}}}"#, i, lat, lon)
                } else {
                    named += 1;
                    format!(r#"{{"type": "node", "id": {}, "lat": {}, "lon": {}, "tags": {{"name": "p{}"}}}}"#, i, lat, lon, i)
                }
            })
            .collect();
        let json = format!(r#"{{"elements": [{}]}}"#, elements.join(","));

        let raw = overpass::parse_elements(&json).unwrap();
        let results = proximity_search::rank(anchor, "cafe", raw);

        assert_eq!(results.len(), named);
        assert!(results.is_sorted_by_distance());
        for record in results.iter() {
            let expected = geo_math::distance_km(anchor, record.coordinate);
            assert!((record.distance_km - expected).abs() < 1e-9);
            assert!(record.name.starts_with('p'));
        }
    }
}
