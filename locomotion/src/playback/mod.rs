//! Playback clock.
//!
//! Advances the current route index by one on a fixed cadence while playing.
//!
//! - [`PlaybackState`] / [`PlaybackClock`]: pure stepping rules over
//!   `(playing, index, route length)`.
//! - [`TickScheduler`]: the one pending tick, as a cancellable spawned task.
//!
//! Any change to the play flag, the index or the route must cancel and
//! reschedule the pending tick. [`Simulation`](crate::simulation::Simulation)
//! does that after every session mutation.

mod scheduler;
mod state;

pub use scheduler::TickScheduler;
pub use state::{PlaybackClock, PlaybackState, DEFAULT_TICK_INTERVAL};
