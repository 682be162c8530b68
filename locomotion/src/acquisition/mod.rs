//! Route acquisition.
//!
//! Combines a [`DirectionsProvider`](crate::provider::DirectionsProvider)
//! with deterministic synthetic generation:
//!
//! - **Direct routes** (start to end) always succeed. Provider failures are
//!   logged and replaced by a 20-segment straight line.
//! - **Multi-point routes** report provider failures as
//!   [`AcquisitionError`]. The synthetic generator for them (10 segments per
//!   leg) is available separately.
//!
//! Synthetic points are spaced 3 seconds apart from the moment the request
//! was issued.

pub mod fallback;
mod loader;

pub use fallback::FallbackConfig;
pub use loader::{AcquisitionError, RouteLoader};
