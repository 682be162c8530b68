//! Integration tests for route acquisition and metrics.
//!
//! These tests cover the path from a provider response to displayed metrics:
//! - OpenRouteService GeoJSON parsing and timestamp assignment
//! - Synthetic fallback routes and their metrics
//! - Formatting of the resulting values
//!
//! Run with: `cargo test --test acquisition_integration`

use chrono::{TimeZone, Utc};

use locomotion::acquisition::{fallback, AcquisitionError, FallbackConfig, RouteLoader};
use locomotion::geo;
use locomotion::metrics::{compute_metrics, format_distance, format_elapsed};
use locomotion::provider::{
    parse_directions, DirectionsFuture, DirectionsProvider, DurationSource, ProviderError,
};
use locomotion::route::{Coordinate, RoutePoint, TravelProfile};
use locomotion::simulation::{DEFAULT_END, DEFAULT_START, DEFAULT_WAYPOINTS};

// ============================================================================
// Helper Functions
// ============================================================================

/// A trimmed OpenRouteService GeoJSON response with segment durations only.
const ORS_SEGMENTS_RESPONSE: &str = r#"{
    "type": "FeatureCollection",
    "features": [{
        "type": "Feature",
        "properties": {
            "segments": [
                {"distance": 700.2, "duration": 40.5, "steps": []},
                {"distance": 512.9, "duration": 29.5, "steps": []}
            ],
            "way_points": [0, 2, 4]
        },
        "geometry": {
            "type": "LineString",
            "coordinates": [
                [79.0882, 21.1458],
                [79.0901, 21.1477],
                [79.0922, 21.1498],
                [79.0950, 21.1525],
                [79.0982, 21.1558]
            ]
        }
    }]
}"#;

/// Provider that always fails, like an unreachable endpoint.
struct OfflineProvider;

impl DirectionsProvider for OfflineProvider {
    fn directions<'a>(
        &'a self,
        _waypoints: &'a [Coordinate],
        _profile: TravelProfile,
    ) -> DirectionsFuture<'a> {
        Box::pin(async { Err(ProviderError::HttpError("network unreachable".to_string())) })
    }

    fn name(&self) -> &str {
        "Offline"
    }
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

// ============================================================================
// Integration Tests
// ============================================================================

/// Segment durations are summed and spread evenly over the geometry.
#[test]
fn test_ors_segments_response_to_metrics() {
    let directions = parse_directions(ORS_SEGMENTS_RESPONSE.as_bytes()).unwrap();
    assert_eq!(
        directions.duration,
        DurationSource::SegmentDurations(vec![40.5, 29.5])
    );

    let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    let route = directions.into_route(t0, 3.0).unwrap();
    assert_eq!(route.len(), 5);

    let last = compute_metrics(&route, 4);
    assert!(close(last.elapsed_time, 70.0));
    assert_eq!(last.progress, 100.0);
    assert!(close(last.total_distance, geo::route_length(&route)));
    assert_eq!(format_elapsed(last.elapsed_time), "01:10");

    let middle = compute_metrics(&route, 2);
    assert!(close(middle.elapsed_time, 35.0));
    assert!(middle.progress > 0.0 && middle.progress < 100.0);
}

/// The direct route never fails: an offline provider yields the straight line.
#[tokio::test]
async fn test_offline_direct_route() {
    let loader = RouteLoader::new(OfflineProvider);
    let route = loader
        .load_direct_route(DEFAULT_START, DEFAULT_END, TravelProfile::Driving)
        .await;

    assert_eq!(route.len(), 21);
    assert_eq!(route[0].coordinate(), DEFAULT_START);
    assert!(close(route[20].latitude, DEFAULT_END.latitude));
    assert!(close(route[20].longitude, DEFAULT_END.longitude));

    let metrics = compute_metrics(&route, 20);
    assert_eq!(metrics.elapsed_time, 60.0);
    assert_eq!(format_elapsed(metrics.elapsed_time), "01:00");
    assert_eq!(format_distance(metrics.total_distance), "1.52km");
}

/// The multi-point route reports failures; the caller decides on fallback.
#[tokio::test]
async fn test_offline_multi_point_route() {
    let loader = RouteLoader::new(OfflineProvider);
    let result = loader
        .load_multi_point_route(&DEFAULT_WAYPOINTS, TravelProfile::Walking)
        .await;
    assert!(matches!(result, Err(AcquisitionError::Provider(_))));

    let route = loader.fallback_multi_point_route(&DEFAULT_WAYPOINTS);
    assert_eq!(route.len(), 33);
    assert_eq!(route[0].coordinate(), DEFAULT_WAYPOINTS[0]);
    assert!(close(route[32].latitude, DEFAULT_WAYPOINTS[3].latitude));
    assert!(close(route[32].longitude, DEFAULT_WAYPOINTS[3].longitude));

    let elapsed = compute_metrics(&route, 32).elapsed_time;
    assert_eq!(elapsed, 96.0);
}

/// Concurrent per-profile loads fall back independently.
#[tokio::test]
async fn test_offline_profile_comparison() {
    let loader = RouteLoader::new(OfflineProvider);
    let routes = loader
        .load_direct_routes(DEFAULT_START, DEFAULT_END, &TravelProfile::ALL)
        .await;

    assert_eq!(routes.len(), 3);
    assert!(routes.iter().all(|(_, route)| route.len() == 21));
}

/// Two points 5 s apart: elapsed 5, speed from the single segment, done.
#[test]
fn test_two_point_scenario() {
    let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let route = vec![
        RoutePoint::new(21.1458, 79.0882, t0),
        RoutePoint::new(21.1459, 79.0883, t0 + chrono::Duration::seconds(5)),
    ];

    let metrics = compute_metrics(&route, 1);
    let d = geo::distance(21.1458, 79.0882, 21.1459, 79.0883);

    assert_eq!(metrics.elapsed_time, 5.0);
    assert!(close(metrics.distance_traveled, d));
    assert!(close(metrics.current_speed, d / 1000.0 / (5.0 / 3600.0)));
    assert_eq!(metrics.progress, 100.0);
}

/// Custom fallback shapes flow through the loader.
#[tokio::test]
async fn test_custom_fallback_config() {
    let config = FallbackConfig {
        direct_segments: 4,
        leg_segments: 2,
        point_spacing: std::time::Duration::from_secs(10),
    };
    let loader = RouteLoader::with_config(OfflineProvider, config.clone());

    let route = loader
        .load_direct_route(DEFAULT_START, DEFAULT_END, TravelProfile::Cycling)
        .await;
    assert_eq!(route.len(), 5);
    assert_eq!(compute_metrics(&route, 4).elapsed_time, 40.0);

    let preview = fallback::simple_route(DEFAULT_START, &config, Utc::now());
    assert_eq!(preview.len(), 5);
    assert_eq!(preview[4].timestamp - preview[0].timestamp, chrono::Duration::seconds(40));
}
