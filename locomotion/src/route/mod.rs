//! Route data model.
//!
//! A route is an ordered, immutable sequence of timestamped positions. It is
//! produced once by the acquisition service and then shared read-only between
//! the session coordinator, the metrics calculator and the view surfaces.

mod model;
mod profile;

pub use model::{Coordinate, ParseCoordinateError, Route, RoutePoint};
pub use profile::{ParseProfileError, TravelProfile};
