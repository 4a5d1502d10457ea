//! Selects located records around an origin.
//!
//! [`filter_within_radius`] is what the map and the alert pages use: it
//! keeps the records whose distance to the origin is at most the radius,
//! in the order they were given. A record that cannot be located is never
//! in range, and neither is one whose distance is NaN.

use ordered_float::OrderedFloat;

use crate::types::{coordinate::Coordinate, record::Locate};
use crate::utils::haversine;

/// Distance from `origin` to `record`, or [`None`] if the record has no
/// coordinate.
pub fn distance_to<R: Locate + ?Sized>(origin: &Coordinate, record: &R) -> Option<f64> {
    record
        .coordinate()
        .map(|coordinate| haversine::distance(origin, &coordinate))
}

/// Whether `record` lies within `radius_km` of `origin`, boundary
/// included.
pub fn is_within_radius<R: Locate + ?Sized>(origin: &Coordinate, record: &R, radius_km: f64) -> bool {
    distance_to(origin, record).map_or(false, |distance| distance <= radius_km)
}

/// Returns the records within `radius_km` of `origin`.
///
/// # Arguments
/// * `origin` - The reference position, usually the user's location.
/// * `records` - Records to select from. Order does not matter.
/// * `radius_km` - Inclusive distance threshold in kilometres.
///
/// # Returns
/// References to the selected records, in input order. Records without a
/// coordinate are skipped silently.
pub fn filter_within_radius<'a, R: Locate>(
    origin: &Coordinate,
    records: &'a [R],
    radius_km: f64,
) -> Vec<&'a R> {
    let selected: Vec<&R> = records
        .iter()
        .filter(|record| is_within_radius(origin, *record, radius_km))
        .collect();
    debug!(
        "{} of {} records within {} km of {}",
        selected.len(),
        records.len(),
        radius_km,
        origin
    );
    selected
}

/// Same selection as [`filter_within_radius`], ordered from nearest to
/// farthest and paired with each distance. Records at the same distance
/// keep their input order.
pub fn filter_within_radius_sorted<'a, R: Locate>(
    origin: &Coordinate,
    records: &'a [R],
    radius_km: f64,
) -> Vec<(&'a R, f64)> {
    let mut selected: Vec<(&R, f64)> = records
        .iter()
        .filter_map(|record| {
            distance_to(origin, record)
                .filter(|distance| *distance <= radius_km)
                .map(|distance| (record, distance))
        })
        .collect();
    selected.sort_by_key(|(_, distance)| OrderedFloat(*distance));
    selected
}

/// Finds the located record closest to `origin`.
///
/// Returns [`None`] when no record has a usable coordinate.
pub fn nearest<'a, R: Locate>(origin: &Coordinate, records: &'a [R]) -> Option<(&'a R, f64)> {
    records
        .iter()
        .filter_map(|record| {
            distance_to(origin, record)
                .filter(|distance| !distance.is_nan())
                .map(|distance| (record, distance))
        })
        .min_by_key(|(_, distance)| OrderedFloat(*distance))
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
