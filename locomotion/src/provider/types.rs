//! Core provider types: errors, parsed directions and the provider trait.

use std::future::Future;
use std::pin::Pin;

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::route::{Coordinate, Route, TravelProfile};

/// Errors that can occur while talking to a directions provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    HttpError(String),

    /// The provider answered with a non-2xx status.
    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    /// The response body could not be understood.
    #[error("Failed to parse directions response: {0}")]
    ParseError(String),

    /// The response parsed but contained no route geometry.
    #[error("Directions response contained no geometry")]
    EmptyGeometry,

    /// The HTTP client could not be constructed.
    #[error("Failed to create HTTP client: {0}")]
    ClientBuild(String),
}

/// Longest accepted route duration in seconds (one year).
pub const MAX_ROUTE_SECONDS: f64 = 365.0 * 24.0 * 3600.0;

/// Where the total travel time of a route comes from.
///
/// Providers report duration either as a route summary, as per-segment
/// values, or not at all. The shape is resolved once when the response is
/// parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum DurationSource {
    /// An explicit total duration in seconds.
    SummaryDuration(f64),
    /// Per-segment durations in seconds.
    SegmentDurations(Vec<f64>),
    /// No usable duration; a per-point heuristic applies.
    Unknown,
}

impl DurationSource {
    /// Resolve from the optional pieces of a response.
    ///
    /// A missing, zero or non-finite summary falls through to segments.
    /// Segments are used only when every value is finite and non-negative;
    /// anything else falls through to `Unknown`.
    pub fn resolve(summary: Option<f64>, segments: Vec<f64>) -> Self {
        let segments_usable = !segments.is_empty()
            && segments.iter().all(|d| d.is_finite() && *d >= 0.0);

        match summary {
            Some(total) if total.is_finite() && total > 0.0 => Self::SummaryDuration(total),
            _ if segments_usable => Self::SegmentDurations(segments),
            _ => Self::Unknown,
        }
    }

    /// Total travel time in seconds for a geometry of `point_count` points.
    pub fn total_seconds(&self, point_count: usize, seconds_per_point: f64) -> f64 {
        match self {
            Self::SummaryDuration(total) => *total,
            Self::SegmentDurations(segments) => segments.iter().sum(),
            Self::Unknown => point_count as f64 * seconds_per_point,
        }
    }
}

/// A route as returned by a provider: geometry plus timing information.
#[derive(Debug, Clone, PartialEq)]
pub struct Directions {
    /// Ordered route geometry.
    pub geometry: Vec<Coordinate>,
    /// How the total duration is known.
    pub duration: DurationSource,
}

impl Directions {
    /// Assign evenly spaced timestamps to the geometry.
    ///
    /// Point `i` is stamped `start + i * total / (n - 1)`. Spacing ignores the
    /// spatial distance between points; a single-point route gets `start`.
    ///
    /// Fails with [`ProviderError::ParseError`] when the total is negative,
    /// not finite, longer than [`MAX_ROUTE_SECONDS`], or pushes a timestamp
    /// past the representable range.
    pub fn into_route(
        self,
        start: DateTime<Utc>,
        seconds_per_point: f64,
    ) -> Result<Route, ProviderError> {
        let count = self.geometry.len();
        let total = self.duration.total_seconds(count, seconds_per_point);
        if !total.is_finite() || !(0.0..=MAX_ROUTE_SECONDS).contains(&total) {
            return Err(ProviderError::ParseError(format!(
                "route duration {} s out of range",
                total
            )));
        }

        let interval = if count > 1 {
            total / (count - 1) as f64
        } else {
            0.0
        };

        self.geometry
            .into_iter()
            .enumerate()
            .map(|(i, coord)| {
                let offset_ms = (i as f64 * interval * 1000.0).round() as i64;
                start
                    .checked_add_signed(Duration::milliseconds(offset_ms))
                    .map(|timestamp| coord.at(timestamp))
                    .ok_or_else(|| {
                        ProviderError::ParseError(format!(
                            "timestamp overflow at point {} (+{} ms)",
                            i, offset_ms
                        ))
                    })
            })
            .collect()
    }
}

/// Boxed future returned by [`DirectionsProvider::directions`].
pub type DirectionsFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Directions, ProviderError>> + Send + 'a>>;

/// A remote routing service.
///
/// The provider is opaque: it is handed an ordered list of coordinates and a
/// travel profile and returns whatever geometry it computes.
pub trait DirectionsProvider: Send + Sync {
    /// Request a route visiting `waypoints` in order.
    fn directions<'a>(
        &'a self,
        waypoints: &'a [Coordinate],
        profile: TravelProfile,
    ) -> DirectionsFuture<'a>;

    /// Human-readable provider name.
    fn name(&self) -> &str;
}
