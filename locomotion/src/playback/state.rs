//! Playback state machine.
//!
//! # State Machine
//!
//! ```text
//! Stopped --[play, index < len-1]--> Running
//! Running --[tick: index += 1]--> Running | AtEnd
//! Running --[pause]--> Stopped
//! any     --[reset]--> Stopped (index 0)
//! ```
//!
//! `AtEnd` is terminal for ticking. The play flag is left as it was, so a
//! vehicle that arrived while playing still reports `playing = true`.

use std::time::Duration;

use serde::Serialize;

use crate::session::SimulationSession;

/// Default time between playback ticks.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(1000);

/// Where playback stands for a given `(playing, index, route length)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PlaybackState {
    /// Not playing, and not at the last point.
    Stopped,
    /// Playing with points left to visit.
    Running,
    /// At the last point. No further ticks.
    AtEnd,
}

impl PlaybackState {
    /// Evaluate the state of a playback position.
    pub fn of(playing: bool, index: usize, route_len: usize) -> Self {
        if route_len > 0 && index >= route_len - 1 {
            PlaybackState::AtEnd
        } else if playing && route_len > 0 {
            PlaybackState::Running
        } else {
            PlaybackState::Stopped
        }
    }

    /// Whether a tick should be pending in this state.
    pub fn should_tick(&self) -> bool {
        matches!(self, PlaybackState::Running)
    }

    /// User-facing status string.
    pub fn display_status(&self) -> &'static str {
        match self {
            PlaybackState::Stopped => "Stopped",
            PlaybackState::Running => "Moving",
            PlaybackState::AtEnd => "Arrived",
        }
    }
}

/// Fixed-cadence playback clock.
///
/// Pure stepping rules; the async scheduling lives in
/// [`TickScheduler`](super::TickScheduler).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackClock {
    tick_interval: Duration,
}

impl Default for PlaybackClock {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl PlaybackClock {
    /// Create a clock ticking every `tick_interval`.
    pub fn new(tick_interval: Duration) -> Self {
        Self { tick_interval }
    }

    /// Time between ticks.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Index after the next tick, or `None` if no tick should be scheduled.
    pub fn next_index(&self, playing: bool, index: usize, route_len: usize) -> Option<usize> {
        PlaybackState::of(playing, index, route_len)
            .should_tick()
            .then_some(index + 1)
    }

    /// Apply one tick to `session`. Returns true if the index advanced.
    pub fn step(&self, session: &mut SimulationSession) -> bool {
        match self.next_index(session.playing, session.current_index, session.route.len()) {
            Some(next) => {
                session.current_index = next;
                true
            }
            None => false,
        }
    }

    /// Index reached after `elapsed` of uninterrupted playback from `index`.
    pub fn index_after(
        &self,
        playing: bool,
        index: usize,
        route_len: usize,
        elapsed: Duration,
    ) -> usize {
        if !PlaybackState::of(playing, index, route_len).should_tick() || self.tick_interval.is_zero()
        {
            return index;
        }

        let ticks = (elapsed.as_nanos() / self.tick_interval.as_nanos()) as usize;
        index.saturating_add(ticks).min(route_len - 1)
    }
}
