//! Generates random located data around an origin.
//!
//! Useful for demos and for sampling properties of the distance and
//! filtering functions over many points.

use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

use super::haversine::EARTH_RADIUS_KM;
use crate::types::{
    coordinate::Coordinate,
    record::Report,
    severity::{ReportType, Severity},
};

const SEVERITIES: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];
const REPORT_TYPES: [ReportType; 4] = [
    ReportType::Illness,
    ReportType::Contamination,
    ReportType::Hygiene,
    ReportType::Raid,
];

/// Generates `capacity` coordinates at most `radius_km` away from
/// `origin` along the great circle.
///
/// Each point is placed at a uniformly random bearing and distance, so
/// points are denser near the origin.
pub fn generate_coordinates_near(
    origin: &Coordinate,
    radius_km: f64,
    capacity: usize,
) -> Vec<Coordinate> {
    let mut rng = rand::thread_rng();
    (0..capacity)
        .map(|_| {
            let bearing = rng.gen_range(0.0..360.0_f64);
            let distance_km = rng.gen_range(0.0..=radius_km.max(0.0));
            destination(origin, bearing, distance_km)
        })
        .collect()
}

/// Generates `capacity` located reports around `origin`, each with a
/// fresh id and a random type and severity.
pub fn generate_reports_near(origin: &Coordinate, radius_km: f64, capacity: usize) -> Vec<Report> {
    let mut rng = rand::thread_rng();
    generate_coordinates_near(origin, radius_km, capacity)
        .into_iter()
        .enumerate()
        .map(|(index, location)| Report {
            id: Uuid::new_v4().to_string(),
            vendor: Some(format!("Vendor {}", index + 1)),
            text: format!("Generated report {}", index + 1),
            kind: REPORT_TYPES[rng.gen_range(0..REPORT_TYPES.len())],
            severity: SEVERITIES[rng.gen_range(0..SEVERITIES.len())],
            timestamp: Some(Utc::now()),
            location: Some(location),
        })
        .collect()
}

/// The point reached by travelling `distance_km` from `origin` along the
/// initial `bearing` (degrees clockwise from north).
pub fn destination(origin: &Coordinate, bearing: f64, distance_km: f64) -> Coordinate {
    let angular = distance_km / EARTH_RADIUS_KM;
    let bearing = bearing.to_radians();
    let lat1 = origin.latitude.to_radians();
    let lon1 = origin.longitude.to_radians();

    let lat2 = (lat1.sin() * angular.cos() + lat1.cos() * angular.sin() * bearing.cos())
        .clamp(-1.0, 1.0)
        .asin();
    let lon2 = lon1
        + (bearing.sin() * angular.sin() * lat1.cos()).atan2(angular.cos() - lat1.sin() * lat2.sin());

    // normalise to [-180, 180)
    let longitude = (lon2.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    Coordinate::new(lat2.to_degrees(), longitude)
}

#[cfg(test)]
mod generator_tests {
    use super::*;
    use crate::types::coordinate::KATHMANDU;
    use crate::types::record::Locate;
    use crate::utils::haversine::distance;

    #[test]
    fn test_generated_points_stay_in_radius() {
        let points = generate_coordinates_near(&KATHMANDU, 20.0, 500);
        assert_eq!(points.len(), 500);
        for point in &points {
            assert!(point.is_in_range());
            assert!(distance(&KATHMANDU, point) <= 20.0 + 1e-6);
        }
    }

    #[test]
    fn test_destination_matches_distance() {
        for bearing in [0.0, 45.0, 90.0, 180.0, 270.0] {
            let point = destination(&KATHMANDU, bearing, 130.0);
            assert!((distance(&KATHMANDU, &point) - 130.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_destination_wraps_longitude() {
        let point = destination(&Coordinate::new(0.0, 179.5), 90.0, 111.2);
        assert!(point.longitude < -179.0, "got {}", point.longitude);
    }

    #[test]
    fn test_generated_reports_are_located_and_unique() {
        let reports = generate_reports_near(&KATHMANDU, 5.0, 50);
        assert!(reports.iter().all(|r| r.coordinate().is_some()));
        let mut ids: Vec<&str> = reports.iter().map(|r| r.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 50);
    }
}
