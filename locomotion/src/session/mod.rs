//! Simulation session state.
//!
//! The [`SessionCoordinator`] owns the route, current index and status flags
//! of one simulation run and is the only writer. Readers get computed views:
//! [`SessionSnapshot`] for status displays, [`MapFrame`] for the map and
//! [`ControlsView`] for the playback controls.

mod coordinator;
mod model;
mod views;

pub use coordinator::{SessionCoordinator, TickKey};
pub use model::{LoadTicket, SimulationSession};
pub use views::{ControlsView, MapFrame, MapOptions, SessionSnapshot};
