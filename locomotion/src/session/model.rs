//! Session state and load tickets.

use crate::route::Route;

/// The full state of one simulation run.
///
/// Invariants, enforced by [`SessionCoordinator`](super::SessionCoordinator):
/// - `current_index < max(1, route.len())`
/// - `playing` implies `!loading` and a non-empty route
/// - `error.is_some()` implies `!loading`
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSession {
    pub route: Route,
    pub current_index: usize,
    pub playing: bool,
    pub loading: bool,
    pub error: Option<String>,
}

impl Default for SimulationSession {
    /// An empty session waiting for its first route.
    fn default() -> Self {
        Self {
            route: Route::empty(),
            current_index: 0,
            playing: false,
            loading: true,
            error: None,
        }
    }
}

/// Identifies one route load.
///
/// Issued by [`SessionCoordinator::begin_load`](super::SessionCoordinator::begin_load).
/// Results carrying an outdated ticket are discarded, so a slow request that
/// finishes after a newer load, reset of the session or teardown cannot
/// overwrite newer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadTicket(pub(crate) u64);

impl LoadTicket {
    /// The generation number of this load.
    pub fn generation(&self) -> u64 {
        self.0
    }
}
