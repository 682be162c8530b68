//! Configuration file handling.

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, ConfigError, ConfigFile, LoggingSettings,
    ProviderSettings, RouteSettings, SimulationSettings, API_KEY_ENV,
};
pub use keys::ConfigKey;
