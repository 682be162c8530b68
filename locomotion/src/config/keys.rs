//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};
use crate::route::{Coordinate, TravelProfile};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Every key the configuration file understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKey {
    ProviderBaseUrl,
    ProviderApiKey,
    ProviderProfile,
    ProviderTimeout,
    SimulationTickIntervalMs,
    SimulationDirectSegments,
    SimulationLegSegments,
    SimulationPointSpacingSecs,
    RouteStart,
    RouteEnd,
    RouteWaypoints,
    LoggingLevel,
    LoggingDirectory,
}

impl ConfigKey {
    /// All keys, grouped by section in file order.
    pub fn all() -> &'static [ConfigKey] {
        &[
            ConfigKey::ProviderBaseUrl,
            ConfigKey::ProviderApiKey,
            ConfigKey::ProviderProfile,
            ConfigKey::ProviderTimeout,
            ConfigKey::SimulationTickIntervalMs,
            ConfigKey::SimulationDirectSegments,
            ConfigKey::SimulationLegSegments,
            ConfigKey::SimulationPointSpacingSecs,
            ConfigKey::RouteStart,
            ConfigKey::RouteEnd,
            ConfigKey::RouteWaypoints,
            ConfigKey::LoggingLevel,
            ConfigKey::LoggingDirectory,
        ]
    }

    /// INI section.
    pub fn section(&self) -> &'static str {
        match self {
            ConfigKey::ProviderBaseUrl
            | ConfigKey::ProviderApiKey
            | ConfigKey::ProviderProfile
            | ConfigKey::ProviderTimeout => "provider",
            ConfigKey::SimulationTickIntervalMs
            | ConfigKey::SimulationDirectSegments
            | ConfigKey::SimulationLegSegments
            | ConfigKey::SimulationPointSpacingSecs => "simulation",
            ConfigKey::RouteStart | ConfigKey::RouteEnd | ConfigKey::RouteWaypoints => "route",
            ConfigKey::LoggingLevel | ConfigKey::LoggingDirectory => "logging",
        }
    }

    /// Key name within the section.
    pub fn key_name(&self) -> &'static str {
        match self {
            ConfigKey::ProviderBaseUrl => "base_url",
            ConfigKey::ProviderApiKey => "api_key",
            ConfigKey::ProviderProfile => "profile",
            ConfigKey::ProviderTimeout => "timeout",
            ConfigKey::SimulationTickIntervalMs => "tick_interval_ms",
            ConfigKey::SimulationDirectSegments => "direct_segments",
            ConfigKey::SimulationLegSegments => "leg_segments",
            ConfigKey::SimulationPointSpacingSecs => "point_spacing_secs",
            ConfigKey::RouteStart => "start",
            ConfigKey::RouteEnd => "end",
            ConfigKey::RouteWaypoints => "waypoints",
            ConfigKey::LoggingLevel => "level",
            ConfigKey::LoggingDirectory => "directory",
        }
    }

    /// Full `section.key` name.
    pub fn name(&self) -> String {
        format!("{}.{}", self.section(), self.key_name())
    }

    /// Current value as a string; empty if unset.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::ProviderBaseUrl => config.provider.base_url.clone(),
            ConfigKey::ProviderApiKey => config.provider.api_key.clone().unwrap_or_default(),
            ConfigKey::ProviderProfile => config.provider.profile.name().to_string(),
            ConfigKey::ProviderTimeout => config.provider.timeout.to_string(),
            ConfigKey::SimulationTickIntervalMs => config.simulation.tick_interval_ms.to_string(),
            ConfigKey::SimulationDirectSegments => config.simulation.direct_segments.to_string(),
            ConfigKey::SimulationLegSegments => config.simulation.leg_segments.to_string(),
            ConfigKey::SimulationPointSpacingSecs => {
                config.simulation.point_spacing_secs.to_string()
            }
            ConfigKey::RouteStart => config.route.start.to_string(),
            ConfigKey::RouteEnd => config.route.end.to_string(),
            ConfigKey::RouteWaypoints => config
                .route
                .waypoints
                .iter()
                .map(Coordinate::to_string)
                .collect::<Vec<_>>()
                .join(";"),
            ConfigKey::LoggingLevel => config.logging.level.clone(),
            ConfigKey::LoggingDirectory => config.logging.directory.display().to_string(),
        }
    }

    /// Validate and store `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        let invalid = |reason: String| ConfigError::InvalidValue {
            key: self.name(),
            value: value.to_string(),
            reason,
        };

        match self {
            ConfigKey::ProviderBaseUrl => {
                if !value.starts_with("http://") && !value.starts_with("https://") {
                    return Err(invalid("expected an http(s) URL".to_string()));
                }
                config.provider.base_url = value.to_string();
            }
            ConfigKey::ProviderApiKey => {
                config.provider.api_key = (!value.is_empty()).then(|| value.to_string());
            }
            ConfigKey::ProviderProfile => {
                config.provider.profile = value
                    .parse::<TravelProfile>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            ConfigKey::ProviderTimeout => {
                config.provider.timeout = parse_positive(value).map_err(invalid)?;
            }
            ConfigKey::SimulationTickIntervalMs => {
                config.simulation.tick_interval_ms = parse_positive(value).map_err(invalid)?;
            }
            ConfigKey::SimulationDirectSegments => {
                config.simulation.direct_segments = parse_positive(value).map_err(invalid)?;
            }
            ConfigKey::SimulationLegSegments => {
                config.simulation.leg_segments = parse_positive(value).map_err(invalid)?;
            }
            ConfigKey::SimulationPointSpacingSecs => {
                config.simulation.point_spacing_secs = value
                    .parse()
                    .map_err(|_| invalid("expected a whole number of seconds".to_string()))?;
            }
            ConfigKey::RouteStart => {
                config.route.start = value
                    .parse::<Coordinate>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            ConfigKey::RouteEnd => {
                config.route.end = value
                    .parse::<Coordinate>()
                    .map_err(|e| invalid(e.to_string()))?;
            }
            ConfigKey::RouteWaypoints => {
                let waypoints = value
                    .split(';')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(Coordinate::from_str)
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| invalid(e.to_string()))?;
                if waypoints.len() < 2 {
                    return Err(invalid("need at least 2 waypoints".to_string()));
                }
                config.route.waypoints = waypoints;
            }
            ConfigKey::LoggingLevel => {
                let level = value.to_lowercase();
                if !LOG_LEVELS.contains(&level.as_str()) {
                    return Err(invalid(format!("expected one of {}", LOG_LEVELS.join(", "))));
                }
                config.logging.level = level;
            }
            ConfigKey::LoggingDirectory => {
                if value.is_empty() {
                    return Err(invalid("directory cannot be empty".to_string()));
                }
                config.logging.directory = expand_home(value);
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ConfigKey::all()
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

fn parse_positive<T>(value: &str) -> Result<T, String>
where
    T: FromStr + PartialOrd + Default,
{
    match value.parse::<T>() {
        Ok(n) if n > T::default() => Ok(n),
        _ => Err("expected a positive whole number".to_string()),
    }
}

/// Expand a leading `~` to the home directory.
fn expand_home(value: &str) -> PathBuf {
    match (value.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ if value == "~" => dirs::home_dir().unwrap_or_else(|| PathBuf::from(value)),
        _ => PathBuf::from(value),
    }
}
