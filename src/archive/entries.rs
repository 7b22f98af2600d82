//! Zip entry inflation and classification by path.
//!
//! | Path                                          | Role                      |
//! |-----------------------------------------------|---------------------------|
//! | `youngandroidproject/project.properties`      | project properties        |
//! | `assets/<file>` (exactly one segment deep)    | asset                     |
//! | `<any>/<folder>/.../component[s].json`        | extension descriptor      |
//! | `<any>/<folder>/.../component_build_info[s].json` | extension build info  |
//! | `*.scm` / `*.bky` outside `assets/`           | screen scheme / blocks    |
//!
//! Everything else (compiled extension jars, nested asset folders, ...) is
//! never inflated.

use std::io::{Cursor, Read};

use tracing::debug;

use super::PROJECT_PROPERTIES;
use crate::error::AiaError;
use crate::extensions::ExtensionFileKind;

/// Top-level directory holding project assets.
const ASSETS_DIR: &str = "assets";

/// What an archive entry is used for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryRole {
    ProjectProperties,
    Scheme,
    Blocks,
    ExtensionFile {
        folder: String,
        kind: ExtensionFileKind,
    },
    Asset,
    Ignored,
}

/// An inflated archive entry.
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Full path inside the zip, `/`-separated.
    pub path: String,
    pub data: Vec<u8>,
}

impl ArchiveEntry {
    /// Last path segment, e.g. `Screen1.scm`.
    pub fn file_name(&self) -> &str {
        file_name(&self.path)
    }

    /// `(stem, extension)` of the file name; see [`split_file_name`].
    pub fn file_info(&self) -> (&str, &str) {
        split_file_name(self.file_name())
    }

    /// Content decoded as UTF-8, with invalid sequences replaced.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }
}

fn file_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Splits `name.ext` at the last dot. A name without a dot has an empty
/// extension.
pub fn split_file_name(name: &str) -> (&str, &str) {
    name.rsplit_once('.').unwrap_or((name, ""))
}

/// Decides the role of an entry from its path alone.
pub fn classify(path: &str) -> EntryRole {
    if path == PROJECT_PROPERTIES {
        return EntryRole::ProjectProperties;
    }

    let segments: Vec<&str> = path.split('/').collect();
    let (stem, extension) = split_file_name(file_name(path));

    if segments.first() == Some(&ASSETS_DIR) && segments.len() == 2 && !segments[1].is_empty() {
        return EntryRole::Asset;
    }

    if extension == "json" {
        if let (Some(kind), Some(folder)) = (ExtensionFileKind::from_stem(stem), segments.get(2)) {
            if !folder.is_empty() && segments.len() > 3 {
                return EntryRole::ExtensionFile {
                    folder: folder.to_string(),
                    kind,
                };
            }
        }
        return EntryRole::Ignored;
    }

    if segments.first() == Some(&ASSETS_DIR) {
        return EntryRole::Ignored;
    }

    match extension {
        "scm" => EntryRole::Scheme,
        "bky" => EntryRole::Blocks,
        _ => EntryRole::Ignored,
    }
}

/// Opens `bytes` as a zip and inflates every entry with a role, in archive
/// order. Directory entries and ignored paths are skipped without reading
/// their content.
///
/// Blocking; callers on the async runtime run it via `spawn_blocking`.
pub fn read_entries(bytes: &[u8]) -> Result<Vec<(EntryRole, ArchiveEntry)>, AiaError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| AiaError::InvalidArchive(format!("not a valid ZIP archive: {e}")))?;

    let mut entries = Vec::new();
    for index in 0..archive.len() {
        let mut file = archive
            .by_index(index)
            .map_err(|e| AiaError::InvalidArchive(format!("cannot open entry {index}: {e}")))?;
        if file.is_dir() {
            continue;
        }

        let path = file.name().to_string();
        let role = classify(&path);
        if role == EntryRole::Ignored {
            debug!(%path, "archive entry ignored");
            continue;
        }

        // Declared sizes are untrusted and never preallocated.
        let mut data = Vec::new();
        file.read_to_end(&mut data)
            .map_err(|e| AiaError::InvalidArchive(format!("cannot read {path}: {e}")))?;
        debug!(%path, ?role, bytes = data.len(), "archive entry read");
        entries.push((role, ArchiveEntry { path, data }));
    }
    Ok(entries)
}
