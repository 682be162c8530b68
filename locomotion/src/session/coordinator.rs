//! The session coordinator: sole owner of session state.

use tracing::debug;

use super::model::{LoadTicket, SimulationSession};
use super::views::{ControlsView, MapFrame, MapOptions, SessionSnapshot};
use crate::metrics::{compute_metrics, VehicleMetadata};
use crate::playback::{PlaybackClock, PlaybackState};
use crate::route::{Route, RoutePoint};

/// The inputs the playback clock depends on.
///
/// When this changes across a mutation, the pending tick must be rescheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickKey {
    pub playing: bool,
    pub current_index: usize,
    pub route_len: usize,
    pub route_version: u64,
}

/// Owns a [`SimulationSession`] and exposes the only ways to change it.
///
/// Every entry point keeps the session invariants: the index is clamped into
/// the route, and playback cannot start while loading or without a route.
#[derive(Debug, Default)]
pub struct SessionCoordinator {
    session: SimulationSession,
    generation: u64,
    route_version: u64,
}

impl SessionCoordinator {
    /// A fresh session in the loading state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read access to the whole session.
    pub fn session(&self) -> &SimulationSession {
        &self.session
    }

    pub fn route(&self) -> &Route {
        &self.session.route
    }

    pub fn current_index(&self) -> usize {
        self.session.current_index
    }

    pub fn playing(&self) -> bool {
        self.session.playing
    }

    pub fn loading(&self) -> bool {
        self.session.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.session.error.as_deref()
    }

    /// Replace the route. Clears loading and error.
    ///
    /// The index is clamped into the new route; an empty route stops playback.
    pub fn set_route(&mut self, route: Route) {
        self.session.route = route;
        self.session.loading = false;
        self.session.error = None;
        self.route_version = self.route_version.wrapping_add(1);
        self.session.current_index = self.clamp_index(self.session.current_index);
        if self.session.route.is_empty() {
            self.session.playing = false;
        }
        debug!(
            points = self.session.route.len(),
            index = self.session.current_index,
            "Route set"
        );
    }

    /// Set the loading flag. Entering the loading state clears the error and
    /// stops playback.
    pub fn set_loading(&mut self, loading: bool) {
        self.session.loading = loading;
        if loading {
            self.session.error = None;
            self.session.playing = false;
        }
    }

    /// Set or clear the error. Always clears loading.
    pub fn set_error(&mut self, error: Option<String>) {
        self.session.error = error;
        self.session.loading = false;
    }

    /// Back to the first point, paused.
    pub fn reset(&mut self) {
        self.session.current_index = 0;
        self.session.playing = false;
    }

    /// Start or stop playback.
    ///
    /// Starting is refused while loading or with an empty route. Returns
    /// whether the flag now equals `playing`.
    pub fn set_playing(&mut self, playing: bool) -> bool {
        if playing && (self.session.loading || self.session.route.is_empty()) {
            return false;
        }
        self.session.playing = playing;
        true
    }

    /// Flip the play flag. Returns the resulting flag.
    pub fn toggle_playing(&mut self) -> bool {
        let target = !self.session.playing;
        self.set_playing(target);
        self.session.playing
    }

    /// Move to `index`, clamped into the route. Returns the applied index.
    pub fn set_current_index(&mut self, index: usize) -> usize {
        self.session.current_index = self.clamp_index(index);
        self.session.current_index
    }

    /// Apply one playback tick. Returns true if the index advanced.
    pub fn advance(&mut self, clock: &PlaybackClock) -> bool {
        clock.step(&mut self.session)
    }

    /// Start a new load: sets loading, clears error, stops playback.
    ///
    /// Results of earlier loads become stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation = self.generation.wrapping_add(1);
        self.set_loading(true);
        LoadTicket(self.generation)
    }

    /// Whether `ticket` belongs to the most recent load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Make every in-flight load stale without starting a new one.
    pub fn invalidate_loads(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// [`set_route`](Self::set_route) if `ticket` is still current.
    pub fn set_route_if_current(&mut self, ticket: LoadTicket, route: Route) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "Discarding stale route");
            return false;
        }
        self.set_route(route);
        true
    }

    /// [`set_error`](Self::set_error) if `ticket` is still current.
    pub fn set_error_if_current(&mut self, ticket: LoadTicket, error: impl Into<String>) -> bool {
        if !self.is_current(ticket) {
            debug!(generation = ticket.0, "Discarding stale load error");
            return false;
        }
        self.set_error(Some(error.into()));
        true
    }

    /// Current playback state.
    pub fn playback_state(&self) -> PlaybackState {
        PlaybackState::of(
            self.session.playing,
            self.session.current_index,
            self.session.route.len(),
        )
    }

    /// Inputs of the playback clock.
    pub fn tick_key(&self) -> TickKey {
        TickKey {
            playing: self.session.playing,
            current_index: self.session.current_index,
            route_len: self.session.route.len(),
            route_version: self.route_version,
        }
    }

    /// Metrics at the current index.
    pub fn metrics(&self) -> VehicleMetadata {
        compute_metrics(&self.session.route, self.session.current_index as i64)
    }

    /// The point the vehicle is at, if there is a route.
    pub fn current_point(&self) -> Option<RoutePoint> {
        self.session.route.get(self.session.current_index).copied()
    }

    /// Point-in-time copy for display.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            route_len: self.session.route.len(),
            current_index: self.session.current_index,
            playing: self.session.playing,
            loading: self.session.loading,
            error: self.session.error.clone(),
            state: self.playback_state(),
            current_point: self.current_point(),
            metadata: self.metrics(),
        }
    }

    /// Geometry for the map surface.
    pub fn map_frame(&self, options: MapOptions) -> MapFrame {
        let route = &self.session.route;
        let vehicle = self.current_point();

        let traveled = if options.show_route && !route.is_empty() {
            route[..=self.session.current_index].to_vec()
        } else {
            Vec::new()
        };

        let center = if options.center_on_vehicle {
            vehicle
                .or_else(|| route.first().copied())
                .map(|p| (p.latitude, p.longitude))
        } else {
            None
        };

        MapFrame {
            traveled,
            vehicle: vehicle.filter(|_| options.show_vehicle),
            center,
        }
    }

    /// Data for the controls surface.
    pub fn controls_view(&self) -> ControlsView {
        ControlsView {
            playing: self.session.playing,
            current_point: self.current_point(),
            metadata: self.metrics(),
        }
    }

    fn clamp_index(&self, index: usize) -> usize {
        index.min(self.session.route.len().saturating_sub(1))
    }
}
