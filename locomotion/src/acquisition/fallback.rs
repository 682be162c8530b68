//! Synthetic route generation used when the provider is unavailable.
//!
//! All generators are deterministic given their inputs and the issue
//! instant: positions are linear interpolations in degree space and
//! timestamps advance by a fixed spacing per emitted point.

use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};

use crate::geo;
use crate::route::{Coordinate, Route};

/// Segments in a synthetic two-point route (21 points).
pub const DEFAULT_DIRECT_SEGMENTS: u32 = 20;

/// Segments per waypoint leg in a synthetic multi-point route.
pub const DEFAULT_LEG_SEGMENTS: u32 = 10;

/// Time between consecutive synthetic points.
pub const DEFAULT_POINT_SPACING: StdDuration = StdDuration::from_secs(3);

/// Per-point step of the offline preview route, in degrees.
pub const SIMPLE_ROUTE_STEP_DEG: f64 = 0.0001;

/// Shape parameters for synthetic routes.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackConfig {
    /// Segments between start and end of a direct route.
    pub direct_segments: u32,
    /// Segments per leg of a multi-point route.
    pub leg_segments: u32,
    /// Time between consecutive points.
    pub point_spacing: StdDuration,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            direct_segments: DEFAULT_DIRECT_SEGMENTS,
            leg_segments: DEFAULT_LEG_SEGMENTS,
            point_spacing: DEFAULT_POINT_SPACING,
        }
    }
}

impl FallbackConfig {
    /// Point spacing in fractional seconds.
    pub fn spacing_secs(&self) -> f64 {
        self.point_spacing.as_secs_f64()
    }

    fn offset(&self, steps: u64) -> Duration {
        Duration::milliseconds(self.point_spacing.as_millis() as i64 * steps as i64)
    }
}

/// Straight-line route from `start` to `end`.
///
/// Yields `direct_segments + 1` points; point `i` sits at fraction
/// `i / direct_segments` and is stamped `issued_at + i * spacing`.
pub fn direct_route(
    start: Coordinate,
    end: Coordinate,
    config: &FallbackConfig,
    issued_at: DateTime<Utc>,
) -> Route {
    let segments = config.direct_segments.max(1);

    (0..=segments)
        .map(|i| {
            let fraction = i as f64 / segments as f64;
            geo::interpolate(start, end, fraction).at(issued_at + config.offset(i as u64))
        })
        .collect()
}

/// Piecewise-linear route through `waypoints`.
///
/// Each leg contributes `leg_segments + 1` points including both of its
/// ends, so interior waypoints appear twice (end of one leg, start of the
/// next). A single running clock advances by one spacing per emitted point
/// across all legs. Fewer than two waypoints yield an empty route.
pub fn multi_point_route(
    waypoints: &[Coordinate],
    config: &FallbackConfig,
    issued_at: DateTime<Utc>,
) -> Route {
    let segments = config.leg_segments.max(1);
    let mut clock = 0u64;
    let mut points = Vec::with_capacity(waypoints.len().saturating_sub(1) * (segments as usize + 1));

    for leg in waypoints.windows(2) {
        for j in 0..=segments {
            let fraction = j as f64 / segments as f64;
            let coord = geo::interpolate(leg[0], leg[1], fraction);
            points.push(coord.at(issued_at + config.offset(clock)));
            clock += 1;
        }
    }

    points.into()
}

/// Offline preview route stepping diagonally north-east from `origin`.
///
/// Yields `direct_segments + 1` points, each `SIMPLE_ROUTE_STEP_DEG` further
/// in both latitude and longitude than the last.
pub fn simple_route(origin: Coordinate, config: &FallbackConfig, issued_at: DateTime<Utc>) -> Route {
    (0..=config.direct_segments)
        .map(|i| {
            let step = i as f64 * SIMPLE_ROUTE_STEP_DEG;
            Coordinate::new(origin.longitude + step, origin.latitude + step)
                .at(issued_at + config.offset(i as u64))
        })
        .collect()
}
