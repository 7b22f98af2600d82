//! The archive reader: zip bytes in, [`Project`] out.
//!
//! # Phases
//! 1. Inflate the zip on a blocking thread and classify entries by path.
//! 2. Parse `project.properties`; its absence aborts the read.
//! 3. Resolve extension descriptors packaged in the archive.
//! 4. Pair `.scm`/`.bky` files by stem and build each screen on its own
//!    blocking task. Results are put back in discovery order, then
//!    `Screen1` is moved to the front.
//! 5. Collect top-level assets.
//!
//! Only phases 1 and 2 can fail. Everything after degrades per item with a
//! warning.

use std::path::Path;
use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use super::entries::{self, ArchiveEntry, EntryRole};
use super::{project_properties, scheme};
use crate::catalog::{DescriptorCatalog, DEFAULT_RUNTIME_PACKAGE};
use crate::config::ReaderConfig;
use crate::error::AiaError;
use crate::extensions::{self, ExtensionFile};
use crate::models::{Asset, Extension, Project, Screen, MAIN_SCREEN};
use crate::tree::ComponentBuilder;

/// Reads `.aia` archives against one descriptor catalog.
///
/// Cheap to clone; the catalog is shared.
#[derive(Debug, Clone)]
pub struct AiaReader {
    catalog: Arc<DescriptorCatalog>,
}

/// A scheme file and its block file, matched by stem.
struct ScreenSource {
    name: String,
    scheme: String,
    blocks: String,
}

/// Entries of one archive, grouped by role.
#[derive(Default)]
struct SortedEntries {
    project_properties: Option<ArchiveEntry>,
    schemes: Vec<ArchiveEntry>,
    blocks: Vec<ArchiveEntry>,
    extension_files: Vec<ExtensionFile>,
    assets: Vec<ArchiveEntry>,
}

impl SortedEntries {
    fn from_entries(entries: Vec<(EntryRole, ArchiveEntry)>) -> Self {
        let mut sorted = Self::default();
        for (role, entry) in entries {
            match role {
                EntryRole::ProjectProperties => {
                    if sorted.project_properties.is_none() {
                        sorted.project_properties = Some(entry);
                    }
                }
                EntryRole::Scheme => sorted.schemes.push(entry),
                EntryRole::Blocks => sorted.blocks.push(entry),
                EntryRole::ExtensionFile { folder, kind } => {
                    sorted.extension_files.push(ExtensionFile {
                        folder,
                        kind,
                        content: entry.text(),
                    });
                }
                EntryRole::Asset => sorted.assets.push(entry),
                EntryRole::Ignored => {}
            }
        }
        sorted
    }
}

impl AiaReader {
    pub fn new(catalog: Arc<DescriptorCatalog>) -> Self {
        Self { catalog }
    }

    /// A reader backed by the catalog compiled into the crate.
    pub async fn with_bundled_catalog() -> Result<Self, AiaError> {
        Ok(Self::new(DescriptorCatalog::bundled().await?))
    }

    /// A reader using `config.catalog_path` when set, else the bundled
    /// catalog.
    pub async fn from_config(config: &ReaderConfig) -> Result<Self, AiaError> {
        match &config.catalog_path {
            Some(path) => {
                let catalog = DescriptorCatalog::load(path, &config.runtime_package).await?;
                Ok(Self::new(Arc::new(catalog)))
            }
            None => {
                if config.runtime_package != DEFAULT_RUNTIME_PACKAGE {
                    warn!(
                        runtime_package = %config.runtime_package,
                        "runtime package ignored without catalog_path; bundled catalog uses the default"
                    );
                }
                Self::with_bundled_catalog().await
            }
        }
    }

    pub fn catalog(&self) -> &DescriptorCatalog {
        &self.catalog
    }

    /// Reads an archive from disk.
    pub async fn read_file(&self, path: &Path) -> Result<Project, AiaError> {
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| AiaError::Io(format!("cannot read {}: {e}", path.display())))?;
        self.read(bytes).await
    }

    /// Reads an archive held in memory.
    pub async fn read(&self, bytes: impl Into<Vec<u8>>) -> Result<Project, AiaError> {
        let bytes = bytes.into();
        let entries = tokio::task::spawn_blocking(move || entries::read_entries(&bytes)).await??;
        let sorted = SortedEntries::from_entries(entries);

        let properties_entry = sorted
            .project_properties
            .ok_or(AiaError::MissingProjectProperties)?;
        let properties = project_properties::parse(&properties_entry.text());
        let mut project = Project::new(project_properties::project_name(&properties));
        project.properties = properties;

        let extensions = Arc::new(extensions::resolve(&sorted.extension_files));
        for ext in extensions.iter() {
            debug!(name = %ext.name, "extension loaded");
        }

        let sources = pair_screen_files(sorted.schemes, sorted.blocks);
        for screen in self.build_screens(sources, Arc::clone(&extensions)).await? {
            project.add_screen(screen);
        }
        if project.main_screen().is_none() {
            warn!(project = %project.name, "archive has no {MAIN_SCREEN}");
        }

        project.extensions = Arc::try_unwrap(extensions).unwrap_or_else(|shared| (*shared).clone());
        project.assets = sorted.assets.into_iter().map(into_asset).collect();

        info!(
            project = %project.name,
            screens = project.screens.len(),
            extensions = project.extensions.len(),
            assets = project.assets.len(),
            "archive read"
        );
        Ok(project)
    }

    /// Builds every screen on its own blocking task, returning them in
    /// `sources` order.
    async fn build_screens(
        &self,
        sources: Vec<ScreenSource>,
        extensions: Arc<Vec<Extension>>,
    ) -> Result<Vec<Screen>, AiaError> {
        let mut tasks = JoinSet::new();
        for (index, source) in sources.into_iter().enumerate() {
            let catalog = Arc::clone(&self.catalog);
            let extensions = Arc::clone(&extensions);
            tasks.spawn_blocking(move || {
                let builder = ComponentBuilder::new(&catalog, &extensions);
                let screen =
                    scheme::build_screen(source.name, &source.scheme, source.blocks, &builder);
                debug!(
                    screen = %screen.name,
                    components = screen.form.count(),
                    "screen built"
                );
                (index, screen)
            });
        }

        let mut built = Vec::with_capacity(tasks.len());
        while let Some(result) = tasks.join_next().await {
            built.push(result?);
        }
        built.sort_by_key(|(index, _)| *index);
        Ok(built.into_iter().map(|(_, screen)| screen).collect())
    }
}

/// Matches each scheme file with the first block file of the same stem.
///
/// Unmatched files on either side are skipped with a warning.
fn pair_screen_files(schemes: Vec<ArchiveEntry>, blocks: Vec<ArchiveEntry>) -> Vec<ScreenSource> {
    let mut blocks: Vec<Option<ArchiveEntry>> = blocks.into_iter().map(Some).collect();
    let mut sources = Vec::with_capacity(schemes.len());

    for scheme_entry in schemes {
        let stem = scheme_entry.file_info().0.to_string();
        let matched = blocks
            .iter_mut()
            .find(|slot| matches!(slot, Some(b) if b.file_info().0 == stem))
            .and_then(Option::take);
        match matched {
            Some(block_entry) => sources.push(ScreenSource {
                name: stem,
                scheme: scheme_entry.text(),
                blocks: block_entry.text(),
            }),
            None => warn!(path = %scheme_entry.path, "scheme file has no block file; screen skipped"),
        }
    }

    for leftover in blocks.into_iter().flatten() {
        warn!(path = %leftover.path, "block file has no scheme file; ignored");
    }
    sources
}

fn into_asset(entry: ArchiveEntry) -> Asset {
    let name = entry.file_name().to_string();
    let file_type = entry.file_info().1.to_string();
    Asset::new(name, file_type, entry.data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(path: &str, text: &str) -> ArchiveEntry {
        ArchiveEntry {
            path: path.to_string(),
            data: text.as_bytes().to_vec(),
        }
    }

    #[test]
    fn pairs_by_stem_in_scheme_order() {
        let sources = pair_screen_files(
            vec![entry("src/a/Screen2.scm", "s2"), entry("src/a/Screen1.scm", "s1")],
            vec![entry("src/a/Screen1.bky", "b1"), entry("src/a/Screen2.bky", "b2")],
        );
        let pairs: Vec<(&str, &str, &str)> = sources
            .iter()
            .map(|s| (s.name.as_str(), s.scheme.as_str(), s.blocks.as_str()))
            .collect();
        assert_eq!(pairs, vec![("Screen2", "s2", "b2"), ("Screen1", "s1", "b1")]);
    }

    #[test]
    fn unpaired_files_are_skipped() {
        let sources = pair_screen_files(
            vec![entry("src/a/Screen1.scm", ""), entry("src/a/Orphan.scm", "")],
            vec![entry("src/a/Screen1.bky", ""), entry("src/a/Lonely.bky", "")],
        );
        assert_eq!(sources.len(), 1);
        assert_eq!(sources[0].name, "Screen1");
    }

    #[test]
    fn asset_takes_name_and_extension_from_path() {
        let asset = into_asset(ArchiveEntry {
            path: "assets/logo.final.png".to_string(),
            data: vec![0; 42],
        });
        assert_eq!(asset.name, "logo.final.png");
        assert_eq!(asset.file_type, "png");
        assert_eq!(asset.size, 42);
    }

    #[tokio::test]
    async fn non_zip_input_is_invalid_archive() {
        let reader = AiaReader::with_bundled_catalog().await.expect("reader");
        let err = reader.read(b"PK but not really".to_vec()).await.expect_err("fail");
        assert!(matches!(err, AiaError::InvalidArchive(_)));
    }

    #[tokio::test]
    async fn missing_file_is_io_error() {
        let reader = AiaReader::with_bundled_catalog().await.expect("reader");
        let err = reader
            .read_file(Path::new("/nonexistent/app.aia"))
            .await
            .expect_err("fail");
        assert!(matches!(err, AiaError::Io(_)));
    }

    #[tokio::test]
    async fn from_config_uses_catalog_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        std::io::Write::write_all(
            &mut file,
            br#"[{ "type": "org.example.rt.Form", "properties": [] }]"#,
        )
        .expect("write");
        let config = ReaderConfig {
            runtime_package: "org.example.rt".to_string(),
            catalog_path: Some(file.path().to_path_buf()),
            ..Default::default()
        };
        let reader = AiaReader::from_config(&config).await.expect("reader");
        assert_eq!(reader.catalog().len(), 1);
        assert!(reader.catalog().lookup_simple("Form").is_some());
    }
}
