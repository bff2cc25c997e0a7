//! Great-circle distance on a spherical Earth.

use crate::config::constants::EARTH_RADIUS_KM;
use crate::data::poi::Coordinate;

/// Haversine distance in kilometres.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let sin_dlat = (dlat / 2.0).sin();
    let sin_dlon = (dlon / 2.0).sin();

    let h = sin_dlat * sin_dlat + lat1.cos() * lat2.cos() * sin_dlon * sin_dlon;
    // Rounding can push h marginally past 1 for antipodal points
    let h = h.clamp(0.0, 1.0);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Total length of a polyline, summing each leg.
pub fn path_length_km(points: &[Coordinate]) -> f64 {
    points.windows(2).map(|w| distance_km(w[0], w[1])).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const DELHI: Coordinate = Coordinate { latitude: 28.6139, longitude: 77.2090 };
    const MUMBAI: Coordinate = Coordinate { latitude: 19.0760, longitude: 72.8777 };

    #[test]
    fn delhi_to_mumbai() {
        let d = distance_km(DELHI, MUMBAI);
        assert!(d > 1150.0 && d < 1160.0, "Expected ~1153 km, got {d}");
    }

    #[test]
    fn identity_is_zero() {
        assert!(distance_km(DELHI, DELHI).abs() < 1e-6);
    }

    #[test]
    fn symmetric_for_random_pairs() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..500 {
            let a = Coordinate::new(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0));
            let b = Coordinate::new(rng.gen_range(-90.0..=90.0), rng.gen_range(-180.0..=180.0));
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-6);
            assert!(distance_km(a, a).abs() < 1e-6);
        }
    }

    #[test]
    fn antipodal_points_are_half_circumference() {
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((distance_km(a, b) - half).abs() < 1e-6);
    }

    #[test]
    fn path_length_sums_legs() {
        let mid = Coordinate::new(23.0, 75.0);
        let total = path_length_km(&[DELHI, mid, MUMBAI]);
        assert!((total - (distance_km(DELHI, mid) + distance_km(mid, MUMBAI))).abs() < 1e-9);
        assert_eq!(path_length_km(&[DELHI]), 0.0);
        assert_eq!(path_length_km(&[]), 0.0);
    }
}
