//! Simulation runtime.
//!
//! [`Simulation`] wires a [`SessionCoordinator`](crate::session::SessionCoordinator),
//! a [`RouteLoader`](crate::acquisition::RouteLoader) and the playback
//! [`TickScheduler`](crate::playback::TickScheduler) together on a tokio runtime.
//!
//! # Reload flow
//!
//! 1. begin a load (loading set, error cleared, playback stopped)
//! 2. reset playback to the first point
//! 3. await the route
//! 4. apply it only if no newer load or shutdown happened meanwhile

mod plan;
mod runtime;

pub use plan::{LoadMode, RoutePlan, DEFAULT_END, DEFAULT_START, DEFAULT_WAYPOINTS};
pub use runtime::{Simulation, MULTI_POINT_LOAD_ERROR};
