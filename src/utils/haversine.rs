//! Great-circle distance on a spherical Earth.

use std::f64::consts::PI;

use crate::types::coordinate::Coordinate;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Distance between two antipodal points, the largest value
/// [`distance`] can return.
pub const MAX_DISTANCE_KM: f64 = PI * EARTH_RADIUS_KM;

/// Great-circle distance in kilometres between two coordinates, using
/// the haversine formula.
///
/// The result is symmetric, never negative and never above
/// [`MAX_DISTANCE_KM`]. Out-of-range inputs are not rejected. A NaN
/// component yields NaN.
pub fn distance(from: &Coordinate, to: &Coordinate) -> f64 {
    distance_between(from.latitude, from.longitude, to.latitude, to.longitude)
}

/// Same as [`distance`] for raw degree values.
pub fn distance_between(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();

    // rounding can push h slightly outside [0, 1]
    let h = ((d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lon / 2.0).sin().powi(2))
    .clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_KM * c
}

//------------------------------------------------------------------
// Unit Tests
//------------------------------------------------------------------
