//! Config command - inspect and edit `~/.locomotion/config.ini`.

use clap::Subcommand;
use console::style;
use locomotion::config::{config_file_path, ConfigFile, ConfigKey, API_KEY_ENV};

use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the effective value of one key
    Get {
        /// Key as section.key, e.g. route.start
        key: String,
    },

    /// Validate and store a value
    Set {
        /// Key as section.key, e.g. simulation.tick_interval_ms
        key: String,

        /// New value; coordinates are lon,lat and waypoints are ;-separated
        value: String,
    },

    /// Restore one key to its built-in default
    Reset {
        /// Key as section.key
        key: String,
    },

    /// Show every key, marking values that differ from the defaults
    List,

    /// Print the config file location
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands) -> Result<(), CliError> {
    match command {
        ConfigCommands::Get { key } => {
            let key = parse_key(&key)?;
            let config = ConfigFile::load()?;
            println!("{}", display_value(key, &config));
            Ok(())
        }
        ConfigCommands::Set { key, value } => update(&key, move |_| value),
        ConfigCommands::Reset { key } => update(&key, |key| key.get(&ConfigFile::default())),
        ConfigCommands::List => {
            let config = ConfigFile::load()?;
            println!("{}", style(config_file_path().display()).dim());
            for line in list_lines(&config) {
                println!("{}", line);
            }
            if std::env::var(API_KEY_ENV).is_ok_and(|v| !v.is_empty()) {
                println!();
                println!("{} overrides provider.api_key", style(API_KEY_ENV).yellow());
            }
            Ok(())
        }
        ConfigCommands::Path => {
            println!("{}", config_file_path().display());
            Ok(())
        }
    }
}

/// Load, apply `new_value` to `key`, save and report `old -> new`.
fn update(key: &str, new_value: impl FnOnce(ConfigKey) -> String) -> Result<(), CliError> {
    let key = parse_key(key)?;
    let mut config = ConfigFile::load()?;
    let before = display_value(key, &config);

    key.set(&mut config, &new_value(key))?;
    config.save()?;

    println!(
        "{}: {} -> {}",
        key.name(),
        style(before).dim(),
        style(display_value(key, &config)).green()
    );
    Ok(())
}

fn parse_key(key: &str) -> Result<ConfigKey, CliError> {
    key.parse().map_err(|_| {
        let known: Vec<String> = ConfigKey::all().iter().map(ConfigKey::name).collect();
        CliError::Config(format!(
            "Unknown key '{}'. Known keys: {}",
            key,
            known.join(", ")
        ))
    })
}

/// Value as shown to the user: secrets masked, unset values labelled.
fn display_value(key: ConfigKey, config: &ConfigFile) -> String {
    let value = key.get(config);
    match (key, value.is_empty()) {
        (_, true) => "(not set)".to_string(),
        (ConfigKey::ProviderApiKey, false) => mask(&value),
        (_, false) => value,
    }
}

fn mask(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("****{}", tail)
    }
}

/// One aligned `name  value` line per key; `*` marks non-default values.
fn list_lines(config: &ConfigFile) -> Vec<String> {
    let defaults = ConfigFile::default();
    let width = ConfigKey::all()
        .iter()
        .map(|key| key.name().len())
        .max()
        .unwrap_or(0);

    ConfigKey::all()
        .iter()
        .map(|&key| {
            let marker = if key.get(config) != key.get(&defaults) {
                '*'
            } else {
                ' '
            };
            format!(
                "{} {:width$}  {}",
                marker,
                key.name(),
                display_value(key, config),
                width = width
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use locomotion::route::TravelProfile;

    #[test]
    fn test_unknown_key_lists_known_keys() {
        let err = parse_key("provider.colour").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("provider.colour"));
        assert!(message.contains("simulation.tick_interval_ms"));
    }

    #[test]
    fn test_api_key_is_masked() {
        let mut config = ConfigFile::default();
        assert_eq!(display_value(ConfigKey::ProviderApiKey, &config), "(not set)");

        config.provider.api_key = Some("5b3ce3597851110001cf6248".to_string());
        assert_eq!(display_value(ConfigKey::ProviderApiKey, &config), "****6248");

        config.provider.api_key = Some("abc".to_string());
        assert_eq!(display_value(ConfigKey::ProviderApiKey, &config), "****");
    }

    #[test]
    fn test_list_marks_changed_values() {
        let mut config = ConfigFile::default();
        config.provider.profile = TravelProfile::Cycling;

        let lines = list_lines(&config);
        assert_eq!(lines.len(), ConfigKey::all().len());

        let profile = lines
            .iter()
            .find(|line| line.contains("provider.profile"))
            .unwrap();
        assert!(profile.starts_with('*'));
        assert!(profile.ends_with("cycling"));

        let timeout = lines
            .iter()
            .find(|line| line.contains("provider.timeout"))
            .unwrap();
        assert!(timeout.starts_with(' '));
    }

    #[test]
    fn test_default_values_are_settable() {
        let defaults = ConfigFile::default();
        let mut config = ConfigFile::default();
        config.simulation.tick_interval_ms = 250;
        config.provider.api_key = Some("secret".to_string());

        for &key in ConfigKey::all() {
            key.set(&mut config, &key.get(&defaults)).unwrap();
        }
        assert_eq!(config, defaults);
    }
}
