//! Great-circle geodesy on a spherical Earth.
//!
//! Provides the haversine distance between latitude/longitude pairs and the
//! route-level aggregations built on it. Inputs are plain degrees; no range
//! validation is done here, callers own that.

use crate::route::{Coordinate, RoutePoint};

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Haversine distance in meters between two latitude/longitude pairs.
///
/// Returns exactly 0 for identical coordinates. The intermediate term is
/// clamped to `[0, 1]` so rounding near antipodal points cannot produce NaN.
#[inline]
pub fn distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    if lat1 == lat2 && lon1 == lon2 {
        return 0.0;
    }

    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lon2 - lon1).to_radians();

    let a = (delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2);
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Distance in meters between two route points.
#[inline]
pub fn point_distance(a: &RoutePoint, b: &RoutePoint) -> f64 {
    distance(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Total length of a route in meters.
///
/// Zero for routes with fewer than two points.
pub fn route_length(route: &[RoutePoint]) -> f64 {
    route
        .windows(2)
        .map(|pair| point_distance(&pair[0], &pair[1]))
        .sum()
}

/// Length of the route prefix ending at `upto_inclusive`, in meters.
///
/// Sums the legs `(i-1, i)` for every `1 <= i <= upto_inclusive`. A bound
/// past the end of the route is treated as the last index.
pub fn traveled_length(route: &[RoutePoint], upto_inclusive: usize) -> f64 {
    if upto_inclusive < 1 || route.len() < 2 {
        return 0.0;
    }

    let end = upto_inclusive.min(route.len() - 1);
    route_length(&route[..=end])
}

/// Linear interpolation between two coordinates.
///
/// `fraction` of 0 yields `start`, 1 yields `end`. Interpolation is done in
/// degree space, which is what the synthetic fallback routes want.
#[inline]
pub fn interpolate(start: Coordinate, end: Coordinate, fraction: f64) -> Coordinate {
    Coordinate::new(
        start.longitude + (end.longitude - start.longitude) * fraction,
        start.latitude + (end.latitude - start.latitude) * fraction,
    )
}
