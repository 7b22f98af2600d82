//! Reader configuration, loaded from TOML.
//!
//! ```toml
//! runtime_package = "com.google.appinventor.components.runtime"
//! catalog_path = "/opt/builder/simple_components.json"
//!
//! [log]
//! level = "debug"
//! to_file = true
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_RUNTIME_PACKAGE;
use crate::error::AiaError;

/// Settings for [`AiaReader::from_config`](crate::AiaReader::from_config).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Package prefix of built-in component types.
    pub runtime_package: String,

    /// Alternate descriptor dataset used instead of the bundled one.
    pub catalog_path: Option<PathBuf>,

    pub log: LogConfig,
}

/// `[log]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter used when `RUST_LOG` is unset, e.g. `"info"` or `"aia_kit=debug"`.
    pub level: String,

    /// Write to a log file instead of stderr.
    pub to_file: bool,

    /// Log file directory. Defaults to `<data dir>/aia-kit`.
    pub directory: Option<PathBuf>,

    pub file_name: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            runtime_package: DEFAULT_RUNTIME_PACKAGE.to_string(),
            catalog_path: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            to_file: false,
            directory: None,
            file_name: "aia-kit.log".to_string(),
        }
    }
}

impl ReaderConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, AiaError> {
        toml::from_str(text).map_err(|e| AiaError::Config(format!("cannot parse config: {e}")))
    }

    /// Reads and parses a TOML file.
    pub fn load(path: &Path) -> Result<Self, AiaError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AiaError::Io(format!("cannot read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }
}
