//! Read-only surfaces handed to the view layer.

use serde::Serialize;

use crate::metrics::VehicleMetadata;
use crate::playback::PlaybackState;
use crate::route::RoutePoint;

/// Point-in-time copy of the session for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub route_len: usize,
    pub current_index: usize,
    pub playing: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub state: PlaybackState,
    pub current_point: Option<RoutePoint>,
    pub metadata: VehicleMetadata,
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            route_len: 0,
            current_index: 0,
            playing: false,
            loading: true,
            error: None,
            state: PlaybackState::Stopped,
            current_point: None,
            metadata: VehicleMetadata::default(),
        }
    }
}

/// What the map surface should draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapOptions {
    /// Keep the view centered on the vehicle.
    pub center_on_vehicle: bool,
    /// Draw the traveled part of the route.
    pub show_route: bool,
    /// Draw the vehicle marker.
    pub show_vehicle: bool,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center_on_vehicle: true,
            show_route: true,
            show_vehicle: true,
        }
    }
}

/// Geometry for one map render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapFrame {
    /// Route prefix up to and including the vehicle, empty if hidden.
    pub traveled: Vec<RoutePoint>,
    /// Vehicle marker position, `None` if hidden or no route.
    pub vehicle: Option<RoutePoint>,
    /// Map center as `(lat, lon)`, `None` to leave the view alone.
    pub center: Option<(f64, f64)>,
}

/// Data for the playback controls panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControlsView {
    pub playing: bool,
    pub current_point: Option<RoutePoint>,
    pub metadata: VehicleMetadata,
}
