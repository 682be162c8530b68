//! What to load: endpoints, waypoints and travel profile.

use crate::route::{Coordinate, TravelProfile};

/// Default start of the demo route (Nagpur).
pub const DEFAULT_START: Coordinate = Coordinate::new(79.0882, 21.1458);

/// Default destination of the demo route.
pub const DEFAULT_END: Coordinate = Coordinate::new(79.0982, 21.1558);

/// Default waypoints of the multi-point demo route.
pub const DEFAULT_WAYPOINTS: [Coordinate; 4] = [
    Coordinate::new(79.0882, 21.1458),
    Coordinate::new(79.0922, 21.1498),
    Coordinate::new(79.0962, 21.1538),
    Coordinate::new(79.0982, 21.1558),
];

/// How a route should be acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Start to end, falling back to a straight line on provider errors.
    #[default]
    Direct,
    /// Through every waypoint; provider errors are reported.
    MultiPoint,
}

/// A route request.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutePlan {
    pub start: Coordinate,
    pub end: Coordinate,
    pub waypoints: Vec<Coordinate>,
    pub profile: TravelProfile,
}

impl Default for RoutePlan {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
            profile: TravelProfile::default(),
        }
    }
}

impl RoutePlan {
    /// Override the travel profile.
    pub fn with_profile(mut self, profile: TravelProfile) -> Self {
        self.profile = profile;
        self
    }
}
