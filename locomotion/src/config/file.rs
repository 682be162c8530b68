//! INI configuration file.
//!
//! Lives at `~/.locomotion/config.ini`. Missing files and missing keys fall
//! back to defaults, so an empty or absent file is a valid configuration.
//!
//! ```ini
//! [provider]
//! base_url = https://api.openrouteservice.org/v2/directions
//! api_key = ...
//! profile = driving
//! timeout = 30
//!
//! [simulation]
//! tick_interval_ms = 1000
//! direct_segments = 20
//! leg_segments = 10
//! point_spacing_secs = 3
//!
//! [route]
//! start = 79.0882,21.1458
//! end = 79.0982,21.1558
//! waypoints = 79.0882,21.1458;79.0922,21.1498;79.0962,21.1538;79.0982,21.1558
//!
//! [logging]
//! level = info
//! directory = ~/.locomotion/logs
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use super::keys::ConfigKey;
use crate::acquisition::FallbackConfig;
use crate::playback::PlaybackClock;
use crate::provider::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::route::{Coordinate, TravelProfile};
use crate::simulation::{RoutePlan, DEFAULT_END, DEFAULT_START, DEFAULT_WAYPOINTS};

/// Environment variable that overrides `provider.api_key`.
pub const API_KEY_ENV: &str = "LOCOMOTION_API_KEY";

const CONFIG_DIR_NAME: &str = ".locomotion";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown configuration key '{0}'")]
    UnknownKey(String),
}

/// `~/.locomotion`, or `./.locomotion` without a home directory.
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Path of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// `[provider]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderSettings {
    pub base_url: String,
    pub api_key: Option<String>,
    pub profile: TravelProfile,
    /// Request timeout in seconds.
    pub timeout: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            profile: TravelProfile::default(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// `[simulation]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationSettings {
    pub tick_interval_ms: u64,
    pub direct_segments: u32,
    pub leg_segments: u32,
    pub point_spacing_secs: u64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        let fallback = FallbackConfig::default();
        Self {
            tick_interval_ms: crate::playback::DEFAULT_TICK_INTERVAL.as_millis() as u64,
            direct_segments: fallback.direct_segments,
            leg_segments: fallback.leg_segments,
            point_spacing_secs: fallback.point_spacing.as_secs(),
        }
    }
}

/// `[route]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSettings {
    pub start: Coordinate,
    pub end: Coordinate,
    pub waypoints: Vec<Coordinate>,
}

impl Default for RouteSettings {
    fn default() -> Self {
        Self {
            start: DEFAULT_START,
            end: DEFAULT_END,
            waypoints: DEFAULT_WAYPOINTS.to_vec(),
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
    pub directory: PathBuf,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: config_directory().join("logs"),
        }
    }
}

/// The parsed configuration file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigFile {
    pub provider: ProviderSettings,
    pub simulation: SimulationSettings,
    pub route: RouteSettings,
    pub logging: LoggingSettings,
}

impl ConfigFile {
    /// Load from the default location. A missing file yields defaults.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path).map_err(|e| match e {
            ini::Error::Io(e) => ConfigError::Read {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            ini::Error::Parse(e) => ConfigError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
        })?;

        Self::from_ini(&ini)
    }

    /// Build from parsed INI, applying every known key that is present.
    pub fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|section| section.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    /// Render as INI. Unset optional values are omitted.
    pub fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            let value = key.get(self);
            if !value.is_empty() {
                ini.with_section(Some(key.section()))
                    .set(key.key_name(), value);
            }
        }
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(write_error)?;
        }
        self.to_ini().write_to_file(path).map_err(write_error)
    }

    /// The API key, with the environment taking precedence over the file.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(API_KEY_ENV)
            .ok()
            .filter(|key| !key.is_empty())
            .or_else(|| self.provider.api_key.clone())
    }

    /// Synthetic route shapes.
    pub fn fallback_config(&self) -> FallbackConfig {
        FallbackConfig {
            direct_segments: self.simulation.direct_segments,
            leg_segments: self.simulation.leg_segments,
            point_spacing: Duration::from_secs(self.simulation.point_spacing_secs),
        }
    }

    /// Playback cadence.
    pub fn playback_clock(&self) -> PlaybackClock {
        PlaybackClock::new(Duration::from_millis(self.simulation.tick_interval_ms))
    }

    /// The configured route request.
    pub fn route_plan(&self) -> RoutePlan {
        RoutePlan {
            start: self.route.start,
            end: self.route.end,
            waypoints: self.route.waypoints.clone(),
            profile: self.provider.profile,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let config = ConfigFile::load_from(&dir.path().join("config.ini")).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.timeout, 30);
        assert_eq!(config.simulation.tick_interval_ms, 1000);
        assert_eq!(config.simulation.direct_segments, 20);
        assert_eq!(config.simulation.leg_segments, 10);
        assert_eq!(config.simulation.point_spacing_secs, 3);
        assert_eq!(config.route.waypoints.len(), 4);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.route_plan(), RoutePlan::default());
        assert_eq!(config.fallback_config(), FallbackConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.ini");

        let mut config = ConfigFile::default();
        config.provider.api_key = Some("secret".to_string());
        config.provider.profile = TravelProfile::Walking;
        config.simulation.tick_interval_ms = 250;
        config.route.waypoints = vec![Coordinate::new(1.5, 2.5), Coordinate::new(3.0, 4.0)];
        config.save_to(&path).unwrap();

        let loaded = ConfigFile::load_from(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[simulation]\ntick_interval_ms = 500\n").unwrap();

        let config = ConfigFile::load_from(&path).unwrap();
        assert_eq!(config.simulation.tick_interval_ms, 500);
        assert_eq!(config.provider, ProviderSettings::default());
        assert_eq!(
            config.playback_clock().tick_interval(),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_invalid_value_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        std::fs::write(&path, "[provider]\nprofile = hovercraft\n").unwrap();

        let err = ConfigFile::load_from(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidValue { ref key, .. } if key == "provider.profile"
        ));
    }

    #[test]
    fn test_unset_api_key_is_omitted() {
        let ini = ConfigFile::default().to_ini();
        let provider = ini.section(Some("provider")).unwrap();
        assert!(provider.get("api_key").is_none());
        assert!(provider.get("base_url").is_some());
    }
}
