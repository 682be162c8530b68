//! CLI error type.

use std::fmt;

use locomotion::acquisition::AcquisitionError;
use locomotion::config::ConfigError;
use locomotion::logging::LoggingError;
use locomotion::provider::ProviderError;

/// Errors surfaced to the user by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line or configuration input.
    Config(String),
    /// Configuration file could not be read or written.
    ConfigFile(ConfigError),
    /// Logging could not be set up.
    Logging(LoggingError),
    /// The directions provider could not be created.
    Provider(ProviderError),
    /// A route could not be acquired.
    Acquisition(AcquisitionError),
    /// The async runtime failed.
    Runtime(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::ConfigFile(e) => write!(f, "Configuration error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
            CliError::Provider(e) => write!(f, "Provider error: {}", e),
            CliError::Acquisition(e) => write!(f, "Route acquisition failed: {}", e),
            CliError::Runtime(msg) => write!(f, "Runtime error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::ConfigFile(e) => Some(e),
            CliError::Logging(e) => Some(e),
            CliError::Provider(e) => Some(e),
            CliError::Acquisition(e) => Some(e),
            CliError::Config(_) | CliError::Runtime(_) => None,
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::ConfigFile(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}

impl From<ProviderError> for CliError {
    fn from(e: ProviderError) -> Self {
        CliError::Provider(e)
    }
}

impl From<AcquisitionError> for CliError {
    fn from(e: AcquisitionError) -> Self {
        CliError::Acquisition(e)
    }
}
