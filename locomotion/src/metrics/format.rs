//! Display formatting for metric values.

use crate::route::RoutePoint;

/// Format seconds as `MM:SS`.
///
/// Minutes are not wrapped into hours, so 3725 s renders as `62:05`.
/// Negative input renders as `00:00`.
pub fn format_elapsed(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Format meters as `"{n}m"` below one kilometer, `"{n.nn}km"` above.
pub fn format_distance(meters: f64) -> String {
    if meters < 1000.0 {
        format!("{}m", meters.round() as i64)
    } else {
        format!("{:.2}km", meters / 1000.0)
    }
}

/// Format a speed as `"{n.n} km/h"`.
pub fn format_speed(kmh: f64) -> String {
    format!("{:.1} km/h", kmh)
}

/// Format progress as `"{n.n}%"`.
pub fn format_progress(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Format a position as `"lat, lon"` with six decimals, or `--` if absent.
pub fn format_position(point: Option<&RoutePoint>) -> String {
    match point {
        Some(p) => format!("{:.6}, {:.6}", p.latitude, p.longitude),
        None => "--".to_string(),
    }
}
