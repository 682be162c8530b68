//! Tracing subscriber setup.
//!
//! Logs go to a daily-rolling file in the configured directory through a
//! non-blocking writer. The returned [`LoggingGuard`] must be held for the
//! lifetime of the program or buffered lines are lost.

use std::path::{Path, PathBuf};

use thiserror::Error;
use time::macros::format_description;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::time::LocalTime;
use tracing_subscriber::EnvFilter;

/// Log file name prefix; the appender adds the date.
pub const LOG_FILE_PREFIX: &str = "locomotion.log";

/// Errors while installing the subscriber.
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("failed to create log directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid log filter '{filter}': {message}")]
    InvalidFilter { filter: String, message: String },

    #[error("a global subscriber is already installed")]
    AlreadyInstalled,
}

/// Keeps the background log writer alive.
#[must_use = "logs are dropped once the guard goes out of scope"]
pub struct LoggingGuard {
    _guard: WorkerGuard,
    log_file: PathBuf,
}

impl LoggingGuard {
    /// Directory and prefix of the active log file.
    pub fn log_file(&self) -> &Path {
        &self.log_file
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise `level` for this crate and
/// `warn` for everything else.
pub fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let directives = format!("warn,locomotion={level},locomotion_cli={level}");
    EnvFilter::try_new(&directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives,
        message: e.to_string(),
    })
}

/// Install the global subscriber writing to `directory`.
pub fn init_logging(directory: &Path, level: &str) -> Result<LoggingGuard, LoggingError> {
    std::fs::create_dir_all(directory).map_err(|source| LoggingError::CreateDirectory {
        path: directory.to_path_buf(),
        source,
    })?;

    let appender = tracing_appender::rolling::daily(directory, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let timer = LocalTime::new(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
    ));

    tracing_subscriber::fmt()
        .with_env_filter(build_filter(level)?)
        .with_timer(timer)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init()
        .map_err(|_| LoggingError::AlreadyInstalled)?;

    Ok(LoggingGuard {
        _guard: guard,
        log_file: directory.join(LOG_FILE_PREFIX),
    })
}
