//! Live vehicle metrics derived from a route and the current position index.
//!
//! Metrics are a pure function of `(route, index)`. Nothing is cached: routes
//! are tens of points long and a full O(n) recompute per tick is cheap.
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, Utc};
//! use locomotion::metrics::compute_metrics;
//! use locomotion::route::RoutePoint;
//!
//! let t0 = Utc::now();
//! let route = vec![
//!     RoutePoint::new(21.1458, 79.0882, t0),
//!     RoutePoint::new(21.1459, 79.0883, t0 + Duration::seconds(5)),
//! ];
//!
//! let metrics = compute_metrics(&route, 1);
//! assert_eq!(metrics.elapsed_time, 5.0);
//! assert_eq!(metrics.progress, 100.0);
//! ```

mod format;

pub use format::{format_distance, format_elapsed, format_position, format_progress, format_speed};

use serde::Serialize;

use crate::geo;
use crate::route::RoutePoint;

/// Derived motion metrics for the vehicle's current position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct VehicleMetadata {
    /// Instantaneous speed over the last leg, km/h.
    pub current_speed: f64,
    /// Seconds since the first route point.
    pub elapsed_time: f64,
    /// Meters covered up to and including the current point.
    pub distance_traveled: f64,
    /// Length of the whole route in meters.
    pub total_distance: f64,
    /// Share of the route covered, 0-100.
    pub progress: f64,
}

impl VehicleMetadata {
    /// Whether every field is zero (the degenerate-input value).
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

/// Compute metrics for the vehicle at `current_index` along `route`.
///
/// An empty route or a negative index yields the all-zero value. An index past
/// the end is treated as the last point.
pub fn compute_metrics(route: &[RoutePoint], current_index: i64) -> VehicleMetadata {
    if route.is_empty() || current_index < 0 {
        return VehicleMetadata::default();
    }

    let index = (current_index as usize).min(route.len() - 1);
    let total_distance = geo::route_length(route);
    let distance_traveled = geo::traveled_length(route, index);
    let elapsed_time = seconds_between(&route[0], &route[index]);

    let current_speed = if index > 0 {
        segment_speed_kmh(&route[index - 1], &route[index])
    } else {
        0.0
    };

    let progress = if total_distance > 0.0 {
        (distance_traveled / total_distance * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    };

    VehicleMetadata {
        current_speed,
        elapsed_time,
        distance_traveled,
        total_distance,
        progress,
    }
}

/// Speed in km/h needed to go from `previous` to `current` in the time between
/// their timestamps.
///
/// Zero when no time passes between the two samples.
pub fn segment_speed_kmh(previous: &RoutePoint, current: &RoutePoint) -> f64 {
    let meters = geo::point_distance(previous, current);
    let hours = seconds_between(previous, current) / 3600.0;

    if hours > 0.0 {
        meters / 1000.0 / hours
    } else {
        0.0
    }
}

/// Signed seconds from `from` to `to`, millisecond resolution.
fn seconds_between(from: &RoutePoint, to: &RoutePoint) -> f64 {
    (to.timestamp - from.timestamp).num_milliseconds() as f64 / 1000.0
}
