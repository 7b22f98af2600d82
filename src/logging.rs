//! Tracing subscriber setup for hosts embedding the reader.
//!
//! Without file logging, events go to stderr. With `to_file`, they are
//! written to a single never-rotated file, by default under the OS data dir:
//!   Linux    ~/.local/share/aia-kit/aia-kit.log
//!   macOS    ~/Library/Application Support/aia-kit/aia-kit.log
//!   Windows  %LOCALAPPDATA%\aia-kit\aia-kit.log
//!
//! `RUST_LOG` overrides the configured level.

use std::path::PathBuf;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use crate::config::LogConfig;
use crate::error::AiaError;

/// Directory under the data dir used when no directory is configured.
const LOG_DIR_NAME: &str = "aia-kit";

/// Installs the global subscriber.
///
/// Returns the appender guard when logging to a file; the host must keep it
/// alive or buffered events are lost. A second call fails with
/// [`AiaError::Logging`].
pub fn init(config: &LogConfig) -> Result<Option<WorkerGuard>, AiaError> {
    let filter = env_filter(&config.level)?;

    if !config.to_file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| AiaError::Logging(format!("cannot install subscriber: {e}")))?;
        return Ok(None);
    }

    let log_dir = log_directory(config);
    // rolling::never panics if it cannot open the file.
    std::fs::create_dir_all(&log_dir).map_err(|e| {
        AiaError::Logging(format!("cannot create log directory {}: {e}", log_dir.display()))
    })?;

    let file_appender = tracing_appender::rolling::never(&log_dir, &config.file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .try_init()
        .map_err(|e| AiaError::Logging(format!("cannot install subscriber: {e}")))?;

    tracing::info!(path = %log_dir.join(&config.file_name).display(), "file logging enabled");
    Ok(Some(guard))
}

/// Configured directory, else `<data dir>/aia-kit`.
pub fn log_directory(config: &LogConfig) -> PathBuf {
    config.directory.clone().unwrap_or_else(|| {
        dirs::data_local_dir()
            .unwrap_or_default()
            .join(LOG_DIR_NAME)
    })
}

fn env_filter(level: &str) -> Result<EnvFilter, AiaError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(level)
            .map_err(|e| AiaError::Logging(format!("invalid log level {level:?}: {e}"))),
    }
}
