//! LocoMotion - vehicle route simulation and metrics engine
//!
//! Simulates a vehicle moving along a route of timestamped positions and
//! derives live motion metrics (speed, elapsed time, distance, progress) as
//! playback advances on a fixed cadence.
//!
//! # Modules
//!
//! - [`geo`]: great-circle distances and route lengths
//! - [`metrics`]: per-index vehicle metrics and display formatting
//! - [`provider`]: directions providers (OpenRouteService)
//! - [`acquisition`]: route loading with synthetic fallbacks
//! - [`playback`]: playback state machine and tick scheduling
//! - [`session`]: session state and its read surfaces
//! - [`simulation`]: the async runtime tying it all together
//! - [`config`], [`logging`]: configuration file and tracing setup

pub mod acquisition;
pub mod config;
pub mod geo;
pub mod logging;
pub mod metrics;
pub mod playback;
pub mod provider;
pub mod route;
pub mod session;
pub mod simulation;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
