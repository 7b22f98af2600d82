//! Resolves extension descriptors shipped inside an archive.
//!
//! Each extension folder under `assets/external_comps/` carries a build-info
//! file and a descriptor file. A standalone extension uses the singular names
//! (`component_build_info.json`, `component.json`) holding one JSON object; a
//! pack uses the plural names (`component_build_infos.json`,
//! `components.json`) holding arrays. Both shapes are normalized to arrays,
//! matched by folder name, and paired index by index.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::{Descriptor, Extension};

/// Which of the four extension files an entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionFileKind {
    BuildInfo,
    BuildInfos,
    Descriptor,
    Descriptors,
}

impl ExtensionFileKind {
    /// Classifies by file stem (name without `.json`).
    pub fn from_stem(stem: &str) -> Option<Self> {
        match stem {
            "component_build_info" => Some(Self::BuildInfo),
            "component_build_infos" => Some(Self::BuildInfos),
            "component" => Some(Self::Descriptor),
            "components" => Some(Self::Descriptors),
            _ => None,
        }
    }

    fn is_pack(self) -> bool {
        matches!(self, Self::BuildInfos | Self::Descriptors)
    }
}

/// One extension JSON file, already read as text.
#[derive(Debug, Clone)]
pub struct ExtensionFile {
    /// Folder identifying the extension or pack.
    pub folder: String,
    pub kind: ExtensionFileKind,
    pub content: String,
}

/// The part of a build-info entry the resolver needs.
#[derive(Debug, Clone, Deserialize)]
struct BuildInfo {
    #[serde(rename = "type")]
    type_name: String,
}

/// Parses a singular or plural file into a list of `T`.
fn parse_list<T: DeserializeOwned>(file: &ExtensionFile) -> Result<Vec<T>, serde_json::Error> {
    if file.kind.is_pack() {
        serde_json::from_str(&file.content)
    } else {
        serde_json::from_str(&file.content).map(|one| vec![one])
    }
}

/// Builds the list of [`Extension`]s from the archive's extension files.
///
/// Extensions are returned in build-info discovery order. Files that fail to
/// parse, build-info folders with no descriptor folder, and pack indices
/// beyond the descriptor array are skipped with a warning.
pub fn resolve(files: &[ExtensionFile]) -> Vec<Extension> {
    let mut build_infos: Vec<(&str, Vec<BuildInfo>)> = Vec::new();
    let mut descriptors: Vec<(&str, Vec<Descriptor>)> = Vec::new();

    for file in files {
        match file.kind {
            ExtensionFileKind::BuildInfo | ExtensionFileKind::BuildInfos => {
                match parse_list::<BuildInfo>(file) {
                    Ok(list) => build_infos.push((file.folder.as_str(), list)),
                    Err(e) => warn!(folder = %file.folder, "skipping malformed extension build info: {e}"),
                }
            }
            ExtensionFileKind::Descriptor | ExtensionFileKind::Descriptors => {
                match parse_list::<Descriptor>(file) {
                    Ok(list) => descriptors.push((file.folder.as_str(), list)),
                    Err(e) => warn!(folder = %file.folder, "skipping malformed extension descriptor: {e}"),
                }
            }
        }
    }

    let mut extensions = Vec::new();
    for (folder, infos) in build_infos {
        let Some((_, descs)) = descriptors.iter().find(|(name, _)| *name == folder) else {
            debug!(folder, "extension build info has no descriptor; ignored");
            continue;
        };
        for (i, info) in infos.into_iter().enumerate() {
            let Some(descriptor) = descs.get(i) else {
                warn!(folder, index = i, type_name = %info.type_name, "pack has no descriptor at this index");
                continue;
            };
            debug!(folder, name = %info.type_name, "extension resolved");
            extensions.push(Extension {
                name: info.type_name,
                descriptor: descriptor.clone(),
            });
        }
    }
    extensions
}
