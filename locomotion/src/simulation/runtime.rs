//! Async simulation runtime.

use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, info};

use super::plan::{LoadMode, RoutePlan};
use crate::acquisition::{AcquisitionError, RouteLoader};
use crate::playback::{PlaybackClock, TickScheduler};
use crate::provider::DirectionsProvider;
use crate::route::{Coordinate, Route, TravelProfile};
use crate::session::{ControlsView, MapFrame, MapOptions, SessionCoordinator, SessionSnapshot};

/// Session error shown when a multi-point load fails.
pub const MULTI_POINT_LOAD_ERROR: &str = "Failed to load multi-point route from API";

/// State shared with the tick task.
///
/// Lock order: `coordinator` before `scheduler`.
struct Shared {
    coordinator: Mutex<SessionCoordinator>,
    scheduler: Mutex<TickScheduler>,
    clock: PlaybackClock,
    updates: watch::Sender<SessionSnapshot>,
}

impl Shared {
    /// Run `f` on the coordinator, then reschedule and publish.
    ///
    /// The pending tick is only replaced when the play flag, the index or
    /// the route changed, so no-op mutations keep the current cadence.
    fn mutate<R>(self: &Arc<Self>, f: impl FnOnce(&mut SessionCoordinator) -> R) -> R {
        let mut coordinator = self.coordinator.lock();
        let before = coordinator.tick_key();
        let result = f(&mut coordinator);

        if coordinator.tick_key() != before {
            self.reschedule(&coordinator);
        }
        self.updates.send_replace(coordinator.snapshot());
        result
    }

    fn reschedule(self: &Arc<Self>, coordinator: &SessionCoordinator) {
        let mut scheduler = self.scheduler.lock();
        if !coordinator.playback_state().should_tick() {
            scheduler.cancel();
            return;
        }

        let weak: Weak<Shared> = Arc::downgrade(self);
        scheduler.schedule(self.clock.tick_interval(), move |sequence| {
            if let Some(shared) = weak.upgrade() {
                shared.on_tick(sequence);
            }
        });
    }

    fn on_tick(self: &Arc<Self>, sequence: u64) {
        let mut coordinator = self.coordinator.lock();
        if !self.scheduler.lock().take_if_current(sequence) {
            debug!(sequence, "Ignoring stale tick");
            return;
        }

        if coordinator.advance(&self.clock) {
            debug!(index = coordinator.current_index(), "Tick");
        }
        self.reschedule(&coordinator);
        self.updates.send_replace(coordinator.snapshot());
    }
}

/// A running simulation: session, route loader and playback clock.
///
/// All methods must be called from within a tokio runtime. Every mutation
/// publishes a [`SessionSnapshot`]; see [`subscribe`](Self::subscribe).
/// Dropping the simulation stops playback and discards in-flight loads.
pub struct Simulation<P: DirectionsProvider> {
    shared: Arc<Shared>,
    loader: RouteLoader<P>,
}

impl<P: DirectionsProvider> Simulation<P> {
    /// Create a simulation with an empty, loading session.
    pub fn new(loader: RouteLoader<P>, clock: PlaybackClock) -> Self {
        let coordinator = SessionCoordinator::new();
        let (updates, _) = watch::channel(coordinator.snapshot());

        Self {
            shared: Arc::new(Shared {
                coordinator: Mutex::new(coordinator),
                scheduler: Mutex::new(TickScheduler::new()),
                clock,
                updates,
            }),
            loader,
        }
    }

    /// The route loader in use.
    pub fn loader(&self) -> &RouteLoader<P> {
        &self.loader
    }

    /// Load a direct route and reset playback.
    ///
    /// Never fails; provider errors yield the synthetic route. Returns false
    /// if a newer load or a shutdown superseded this one.
    pub async fn load_route(
        &self,
        start: Coordinate,
        end: Coordinate,
        profile: TravelProfile,
    ) -> bool {
        let ticket = self.shared.mutate(|c| {
            let ticket = c.begin_load();
            c.reset();
            ticket
        });

        let route = self.loader.load_direct_route(start, end, profile).await;
        self.shared.mutate(|c| c.set_route_if_current(ticket, route))
    }

    /// Load a route through `waypoints` and reset playback.
    ///
    /// On failure the session keeps its previous route and shows
    /// [`MULTI_POINT_LOAD_ERROR`].
    pub async fn load_multi_point_route(
        &self,
        waypoints: &[Coordinate],
        profile: TravelProfile,
    ) -> Result<bool, AcquisitionError> {
        let ticket = self.shared.mutate(|c| {
            let ticket = c.begin_load();
            c.reset();
            ticket
        });

        match self.loader.load_multi_point_route(waypoints, profile).await {
            Ok(route) => Ok(self.shared.mutate(|c| c.set_route_if_current(ticket, route))),
            Err(e) => {
                self.shared
                    .mutate(|c| c.set_error_if_current(ticket, MULTI_POINT_LOAD_ERROR));
                Err(e)
            }
        }
    }

    /// Load `plan` in the given mode.
    pub async fn load_plan(&self, plan: &RoutePlan, mode: LoadMode) -> Result<bool, AcquisitionError> {
        info!(?mode, profile = %plan.profile, "Loading route");
        match mode {
            LoadMode::Direct => Ok(self.load_route(plan.start, plan.end, plan.profile).await),
            LoadMode::MultiPoint => {
                self.load_multi_point_route(&plan.waypoints, plan.profile)
                    .await
            }
        }
    }

    /// Install `route` directly, superseding any in-flight load.
    pub fn set_route(&self, route: Route) {
        self.shared.mutate(|c| {
            c.invalidate_loads();
            c.reset();
            c.set_route(route);
        });
    }

    /// Toggle playback. Returns the resulting play flag.
    pub fn play_pause(&self) -> bool {
        self.shared.mutate(|c| c.toggle_playing())
    }

    /// Start or stop playback. Returns false if starting was refused.
    pub fn set_playing(&self, playing: bool) -> bool {
        self.shared.mutate(|c| c.set_playing(playing))
    }

    /// Back to the first point, paused.
    pub fn reset(&self) {
        self.shared.mutate(|c| c.reset());
    }

    /// Jump to `index`, clamped into the route. Returns the applied index.
    pub fn set_current_index(&self, index: usize) -> usize {
        self.shared.mutate(|c| c.set_current_index(index))
    }

    /// Current state.
    pub fn snapshot(&self) -> SessionSnapshot {
        self.shared.coordinator.lock().snapshot()
    }

    /// Geometry for the map surface.
    pub fn map_frame(&self, options: MapOptions) -> MapFrame {
        self.shared.coordinator.lock().map_frame(options)
    }

    /// Data for the controls surface.
    pub fn controls_view(&self) -> ControlsView {
        self.shared.coordinator.lock().controls_view()
    }

    /// Receive a snapshot after every change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.shared.updates.subscribe()
    }

    /// Whether a playback tick is pending.
    pub fn tick_pending(&self) -> bool {
        self.shared.scheduler.lock().is_pending()
    }

    /// Stop playback, cancel the pending tick and discard in-flight loads.
    pub fn shutdown(&self) {
        self.shared.mutate(|c| {
            c.invalidate_loads();
            c.set_playing(false);
        });
        self.shared.scheduler.lock().cancel();
        debug!("Simulation shut down");
    }
}

impl<P: DirectionsProvider> Drop for Simulation<P> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::acquisition::FallbackConfig;
    use crate::playback::PlaybackState;
    use crate::provider::{MockHttpClient, OpenRouteServiceProvider};
    use std::time::Duration;

    type MockSimulation = Simulation<OpenRouteServiceProvider<MockHttpClient>>;

    const START: Coordinate = Coordinate::new(79.0882, 21.1458);
    const END: Coordinate = Coordinate::new(79.0982, 21.1558);

    const THREE_POINTS: &str = r#"{
        "features": [{
            "geometry": {"coordinates": [[79.0882, 21.1458], [79.0930, 21.1500], [79.0982, 21.1558]]},
            "properties": {"summary": {"duration": 60.0}}
        }]
    }"#;

    fn simulation(mock: MockHttpClient) -> MockSimulation {
        let provider = OpenRouteServiceProvider::new(mock, None);
        Simulation::new(
            RouteLoader::with_config(provider, FallbackConfig::default()),
            PlaybackClock::default(),
        )
    }

    async fn sleep_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_snapshot_is_loading() {
        let sim = simulation(MockHttpClient::json(THREE_POINTS));
        let snapshot = sim.snapshot();
        assert!(snapshot.loading);
        assert_eq!(snapshot.route_len, 0);
        assert!(!sim.play_pause());
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_route_applies_provider_route() {
        let sim = simulation(MockHttpClient::json(THREE_POINTS));
        assert!(sim.load_route(START, END, TravelProfile::Driving).await);

        let snapshot = sim.snapshot();
        assert!(!snapshot.loading);
        assert_eq!(snapshot.route_len, 3);
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.playing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_route_falls_back() {
        let sim = simulation(MockHttpClient::failing());
        assert!(sim.load_route(START, END, TravelProfile::Driving).await);
        assert_eq!(sim.snapshot().route_len, 21);
        assert_eq!(sim.snapshot().error, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_playback_advances_each_tick() {
        let sim = simulation(MockHttpClient::json(THREE_POINTS));
        sim.load_route(START, END, TravelProfile::Driving).await;

        assert!(sim.play_pause());
        assert!(sim.tick_pending());

        sleep_ms(1010).await;
        assert_eq!(sim.snapshot().current_index, 1);

        sleep_ms(1000).await;
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.current_index, 2);
        assert_eq!(snapshot.state, PlaybackState::AtEnd);
        assert!(snapshot.playing);
        assert!(!sim.tick_pending());

        sleep_ms(5000).await;
        assert_eq!(sim.snapshot().current_index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;

        sim.play_pause();
        sleep_ms(1500).await;
        assert!(!sim.play_pause());
        assert!(!sim.tick_pending());

        sleep_ms(3000).await;
        assert_eq!(sim.snapshot().current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_seek_restarts_cadence() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;

        sim.play_pause();
        sleep_ms(600).await;
        assert_eq!(sim.set_current_index(10), 10);

        // The tick due at 1000 ms was replaced by one at 1600 ms
        sleep_ms(600).await;
        assert_eq!(sim.snapshot().current_index, 10);
        sleep_ms(500).await;
        assert_eq!(sim.snapshot().current_index, 11);
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_stops_and_rewinds() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;

        sim.play_pause();
        sleep_ms(2500).await;
        sim.reset();

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert!(!snapshot.playing);
        assert!(!sim.tick_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_multi_point_failure_keeps_route() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;

        let result = sim
            .load_multi_point_route(&[START, END], TravelProfile::Driving)
            .await;
        assert!(result.is_err());

        let snapshot = sim.snapshot();
        assert_eq!(snapshot.error.as_deref(), Some(MULTI_POINT_LOAD_ERROR));
        assert!(!snapshot.loading);
        assert_eq!(snapshot.route_len, 21);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_plan_multi_point() {
        let sim = simulation(MockHttpClient::json(THREE_POINTS));
        let applied = sim
            .load_plan(&RoutePlan::default(), LoadMode::MultiPoint)
            .await
            .unwrap();
        assert!(applied);
        assert_eq!(sim.snapshot().route_len, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_subscribers_see_changes() {
        let sim = simulation(MockHttpClient::json(THREE_POINTS));
        let mut updates = sim.subscribe();

        sim.load_route(START, END, TravelProfile::Driving).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().route_len, 3);

        sim.play_pause();
        sleep_ms(1010).await;
        assert!(updates.has_changed().unwrap());
        assert_eq!(updates.borrow_and_update().current_index, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_stops_playback() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;
        sim.play_pause();

        sim.shutdown();
        assert!(!sim.tick_pending());
        sleep_ms(3000).await;
        assert_eq!(sim.snapshot().current_index, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_route_replaces_session() {
        let sim = simulation(MockHttpClient::failing());
        sim.load_route(START, END, TravelProfile::Driving).await;
        sim.set_current_index(15);

        sim.set_route(crate::acquisition::fallback::simple_route(
            START,
            &FallbackConfig::default(),
            chrono::Utc::now(),
        ));
        let snapshot = sim.snapshot();
        assert_eq!(snapshot.route_len, 21);
        assert_eq!(snapshot.current_index, 0);
    }
}
