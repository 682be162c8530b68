//! Route points, coordinates and the shared route container.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single timestamped position along a route.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
    /// When the vehicle is scheduled to be at this position.
    pub timestamp: DateTime<Utc>,
}

impl RoutePoint {
    /// Create a new route point.
    pub fn new(latitude: f64, longitude: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            latitude,
            longitude,
            timestamp,
        }
    }

    /// The position of this point as a provider coordinate.
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.longitude, self.latitude)
    }
}

/// A longitude/latitude pair as exchanged with the directions provider.
///
/// Providers speak GeoJSON, which orders positions as `[lon, lat]`. Keeping
/// this as a distinct type stops the two orders from being mixed up at the
/// boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
}

impl Coordinate {
    /// Create a coordinate from longitude and latitude (GeoJSON order).
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// The `[lon, lat]` array sent on the wire.
    pub fn to_lon_lat(self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }

    /// Attach a timestamp, producing a route point.
    pub fn at(self, timestamp: DateTime<Utc>) -> RoutePoint {
        RoutePoint::new(self.latitude, self.longitude, timestamp)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.longitude, self.latitude)
    }
}

/// Returned when a `"lon,lat"` string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordinateError {
    #[error("expected 'lon,lat', got '{0}'")]
    MissingSeparator(String),

    #[error("invalid longitude '{0}'")]
    InvalidLongitude(String),

    #[error("invalid latitude '{0}'")]
    InvalidLatitude(String),
}

impl FromStr for Coordinate {
    type Err = ParseCoordinateError;

    /// Parses `"lon,lat"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lon, lat) = s
            .split_once(',')
            .ok_or_else(|| ParseCoordinateError::MissingSeparator(s.to_string()))?;

        let (lon, lat) = (lon.trim(), lat.trim());
        let longitude: f64 = lon
            .parse()
            .map_err(|_| ParseCoordinateError::InvalidLongitude(lon.to_string()))?;
        let latitude: f64 = lat
            .parse()
            .map_err(|_| ParseCoordinateError::InvalidLatitude(lat.to_string()))?;

        Ok(Self::new(longitude, latitude))
    }
}

/// An immutable, cheaply clonable route.
///
/// Routes are never mutated in place; a reload replaces the whole value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Route {
    points: Arc<[RoutePoint]>,
}

impl Route {
    /// An empty route.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The points of this route in traversal order.
    pub fn points(&self) -> &[RoutePoint] {
        &self.points
    }

    /// The last valid index, or `None` for an empty route.
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }
}

impl Deref for Route {
    type Target = [RoutePoint];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl From<Vec<RoutePoint>> for Route {
    fn from(points: Vec<RoutePoint>) -> Self {
        Self {
            points: points.into(),
        }
    }
}

impl FromIterator<RoutePoint> for Route {
    fn from_iter<I: IntoIterator<Item = RoutePoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}
