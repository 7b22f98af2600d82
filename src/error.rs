//! Crate-level error type returned by every fallible public operation.
//!
//! `AiaError` is serialized to `{ kind, message }` JSON payloads so a viewer
//! shell can pattern-match on a stable `kind` string.
//!
//! Only the conditions listed here abort an archive read. Per-component,
//! per-screen and per-extension problems are absorbed by the pipeline and
//! show up as faulty or missing entries instead.

use crate::archive::PROJECT_PROPERTIES;

/// Top-level error returned by the reader, catalog, config and logging APIs.
///
/// Serialized with serde's adjacently-tagged representation:
/// `{ "kind": "<variant>", "message": "<human-readable text>" }`
#[derive(Debug, thiserror::Error, serde::Serialize)]
#[serde(tag = "kind", content = "message")]
pub enum AiaError {
    /// The input could not be opened as a zip container.
    #[error("{0}")]
    InvalidArchive(String),

    /// The archive has no `youngandroidproject/project.properties` entry.
    #[error("invalid AIA file: {} not found", PROJECT_PROPERTIES)]
    MissingProjectProperties,

    /// A generic I/O error; the inner [`std::io::Error`] is converted to a
    /// string at the boundary so it remains serializable.
    #[error("{0}")]
    Io(String),

    /// A descriptor dataset could not be parsed.
    #[error("{0}")]
    Catalog(String),

    /// A configuration file could not be parsed.
    #[error("{0}")]
    Config(String),

    /// The tracing subscriber could not be installed.
    #[error("{0}")]
    Logging(String),

    /// A background decoding task panicked or was cancelled.
    #[error("{0}")]
    Task(String),

    /// The asset URL store is unusable (poisoned lock).
    #[error("{0}")]
    AssetUrl(String),
}

impl From<std::io::Error> for AiaError {
    /// Convert an [`std::io::Error`] into an [`AiaError::Io`].
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<tokio::task::JoinError> for AiaError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::Task(format!("decoding task failed: {e}"))
    }
}
