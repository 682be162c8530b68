//! Travel profiles understood by the directions provider.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How the vehicle travels; selects the provider's routing profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelProfile {
    #[default]
    Driving,
    Walking,
    Cycling,
}

impl TravelProfile {
    /// All profiles, in display order.
    pub const ALL: [TravelProfile; 3] = [
        TravelProfile::Driving,
        TravelProfile::Walking,
        TravelProfile::Cycling,
    ];

    /// The provider's identifier for this profile.
    pub fn provider_id(&self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving-car",
            TravelProfile::Walking => "foot-walking",
            TravelProfile::Cycling => "cycling-regular",
        }
    }

    /// Short user-facing name.
    pub fn name(&self) -> &'static str {
        match self {
            TravelProfile::Driving => "driving",
            TravelProfile::Walking => "walking",
            TravelProfile::Cycling => "cycling",
        }
    }
}

impl fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a profile string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown travel profile '{0}' (expected driving, walking or cycling)")]
pub struct ParseProfileError(pub String);

impl FromStr for TravelProfile {
    type Err = ParseProfileError;

    /// Accepts both short names and provider ids.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        TravelProfile::ALL
            .into_iter()
            .find(|p| p.name() == lowered || p.provider_id() == lowered)
            .ok_or_else(|| ParseProfileError(s.to_string()))
    }
}
