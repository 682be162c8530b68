//! Shared setup for commands that run the simulation.

use locomotion::acquisition::RouteLoader;
use locomotion::config::{ConfigFile, API_KEY_ENV};
use locomotion::logging::{init_logging, LoggingGuard};
use locomotion::provider::{OpenRouteServiceProvider, ReqwestClient};
use tracing::{info, warn};

use crate::error::CliError;

/// The loader type every command uses.
pub type CliLoader = RouteLoader<OpenRouteServiceProvider<ReqwestClient>>;

/// Loaded configuration plus an installed logger.
pub struct CliRunner {
    config: ConfigFile,
    logging: LoggingGuard,
}

impl CliRunner {
    /// Load the configuration file and start logging.
    pub fn new() -> Result<Self, CliError> {
        let config = ConfigFile::load()?;
        let logging = init_logging(&config.logging.directory, &config.logging.level)?;
        Ok(Self { config, logging })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Record the command and environment in the log.
    pub fn log_startup(&self, command: &str) {
        info!(
            version = locomotion::VERSION,
            command,
            log_file = %self.logging.log_file().display(),
            base_url = %self.config.provider.base_url,
            "LocoMotion starting"
        );
    }

    /// Build a route loader for the configured provider.
    pub fn route_loader(&self) -> Result<CliLoader, CliError> {
        let api_key = self.config.api_key();
        if api_key.is_none() {
            warn!("No API key configured, provider requests will likely fail");
            println!(
                "Note: no API key set ({} or provider.api_key); synthetic routes will be used.",
                API_KEY_ENV
            );
        }

        let client = ReqwestClient::with_timeout(self.config.provider.timeout)?;
        let provider =
            OpenRouteServiceProvider::with_base_url(client, api_key, &self.config.provider.base_url);
        Ok(RouteLoader::with_config(
            provider,
            self.config.fallback_config(),
        ))
    }

    /// Single-threaded runtime for the command.
    pub fn runtime(&self) -> Result<tokio::runtime::Runtime, CliError> {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| CliError::Runtime(e.to_string()))
    }
}
