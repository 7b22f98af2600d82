//! Descriptor catalog for built-in component types.
//!
//! The catalog maps fully-qualified type names
//! (`<runtime package>.<TypeName>`) to their [`Descriptor`]. It is read-only
//! once built and is shared between concurrent screen builds behind an
//! [`Arc`]. Extension descriptors are never merged in; the tree builder
//! consults extensions first and falls back to this catalog.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::AiaError;
use crate::models::Descriptor;

/// Package of App Inventor's built-in component classes.
pub const DEFAULT_RUNTIME_PACKAGE: &str = "com.google.appinventor.components.runtime";

/// Dataset compiled into the crate, in `simple_components.json` format.
const BUNDLED_DESCRIPTORS: &str = include_str!("../data/simple_components.json");

static BUNDLED: OnceCell<Arc<DescriptorCatalog>> = OnceCell::const_new();

/// Lookup table from fully-qualified component type to descriptor.
#[derive(Debug)]
pub struct DescriptorCatalog {
    runtime_package: String,
    descriptors: HashMap<String, Descriptor>,
}

impl DescriptorCatalog {
    /// Parses a JSON array of descriptors.
    ///
    /// When two descriptors share a type the first one is kept.
    pub fn from_json_str(json: &str, runtime_package: &str) -> Result<Self, AiaError> {
        let list: Vec<Descriptor> = serde_json::from_str(json)
            .map_err(|e| AiaError::Catalog(format!("cannot parse descriptor dataset: {e}")))?;

        let mut descriptors = HashMap::with_capacity(list.len());
        for descriptor in list {
            if descriptors.contains_key(&descriptor.type_name) {
                tracing::debug!(type_name = %descriptor.type_name, "duplicate descriptor ignored");
                continue;
            }
            descriptors.insert(descriptor.type_name.clone(), descriptor);
        }

        Ok(Self {
            runtime_package: runtime_package.to_string(),
            descriptors,
        })
    }

    /// The catalog compiled into the crate, parsed once per process.
    pub async fn bundled() -> Result<Arc<Self>, AiaError> {
        BUNDLED
            .get_or_try_init(|| async {
                let catalog = tokio::task::spawn_blocking(|| {
                    Self::from_json_str(BUNDLED_DESCRIPTORS, DEFAULT_RUNTIME_PACKAGE)
                })
                .await??;
                tracing::debug!(descriptors = catalog.len(), "bundled descriptor catalog loaded");
                Ok::<_, AiaError>(Arc::new(catalog))
            })
            .await
            .cloned()
    }

    /// Reads a dataset from disk.
    pub async fn load(path: &Path, runtime_package: &str) -> Result<Self, AiaError> {
        let json = tokio::fs::read_to_string(path).await.map_err(|e| {
            AiaError::Io(format!("cannot read descriptor dataset {}: {e}", path.display()))
        })?;
        let runtime_package = runtime_package.to_string();
        tokio::task::spawn_blocking(move || Self::from_json_str(&json, &runtime_package)).await?
    }

    /// Looks up a descriptor by fully-qualified type.
    pub fn lookup(&self, type_name: &str) -> Option<&Descriptor> {
        self.descriptors.get(type_name)
    }

    /// Looks up a built-in type by the simple name used in scheme `$Type`.
    pub fn lookup_simple(&self, simple_name: &str) -> Option<&Descriptor> {
        self.lookup(&self.qualify(simple_name))
    }

    /// `Button` → `com.google.appinventor.components.runtime.Button`.
    pub fn qualify(&self, simple_name: &str) -> String {
        format!("{}.{}", self.runtime_package, simple_name)
    }

    pub fn runtime_package(&self) -> &str {
        &self.runtime_package
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// All fully-qualified type names, sorted.
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bundled_catalog_has_form_and_common_components() {
        let catalog = DescriptorCatalog::bundled().await.expect("bundled catalog");
        for simple in ["Form", "Button", "Label", "Clock", "TinyDB", "HorizontalArrangement"] {
            assert!(
                catalog.lookup_simple(simple).is_some(),
                "{simple} missing from bundled catalog"
            );
        }
        assert_eq!(catalog.runtime_package(), DEFAULT_RUNTIME_PACKAGE);
    }

    #[tokio::test]
    async fn bundled_catalog_covers_the_palette() {
        let catalog = DescriptorCatalog::bundled().await.expect("bundled catalog");
        for simple in [
            "ListPicker",
            "DatePicker",
            "TimePicker",
            "ImagePicker",
            "VideoPlayer",
            "Camera",
            "LocationSensor",
            "TextToSpeech",
            "Sharing",
            "Map",
            "Marker",
            "FirebaseDB",
            "CloudDB",
            "BluetoothClient",
            "Texting",
            "Chart",
            "Ev3Motors",
            "NxtDrive",
        ] {
            assert!(
                catalog.lookup_simple(simple).is_some(),
                "{simple} missing from bundled catalog"
            );
        }
        assert!(catalog.len() >= 100, "only {} descriptors bundled", catalog.len());

        let picker = catalog.lookup_simple("ListPicker").expect("ListPicker");
        assert!(picker.is_visible());
        assert!(picker.declared_property("ElementsFromString").is_some());
        assert!(!catalog.lookup_simple("LocationSensor").expect("LocationSensor").is_visible());
    }

    #[tokio::test]
    async fn bundled_catalog_is_shared() {
        let a = DescriptorCatalog::bundled().await.expect("bundled catalog");
        let b = DescriptorCatalog::bundled().await.expect("bundled catalog");
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn clock_is_non_visible_button_is_visible() {
        let catalog = DescriptorCatalog::bundled().await.expect("bundled catalog");
        assert!(!catalog.lookup_simple("Clock").expect("Clock").is_visible());
        assert!(catalog.lookup_simple("Button").expect("Button").is_visible());
    }

    #[test]
    fn lookup_requires_fully_qualified_name() {
        let catalog = DescriptorCatalog::from_json_str(
            r#"[{ "type": "com.example.rt.Button", "properties": [] }]"#,
            "com.example.rt",
        )
        .expect("catalog");
        assert!(catalog.lookup("com.example.rt.Button").is_some());
        assert!(catalog.lookup("Button").is_none());
        assert!(catalog.lookup_simple("Button").is_some());
    }

    #[test]
    fn first_duplicate_wins() {
        let catalog = DescriptorCatalog::from_json_str(
            r#"[
                { "type": "p.A", "name": "first" },
                { "type": "p.A", "name": "second" }
            ]"#,
            "p",
        )
        .expect("catalog");
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.lookup("p.A").expect("A").name, "first");
    }

    #[test]
    fn invalid_dataset_is_catalog_error() {
        let err = DescriptorCatalog::from_json_str(r#"{ "not": "an array" }"#, "p")
            .expect_err("object is not a dataset");
        assert!(matches!(err, AiaError::Catalog(_)));
    }

    #[tokio::test]
    async fn load_reads_dataset_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("components.json");
        std::fs::write(&path, r#"[{ "type": "x.y.Widget", "nonVisible": "true" }]"#)
            .expect("write dataset");
        let catalog = DescriptorCatalog::load(&path, "x.y").await.expect("load");
        assert!(!catalog.lookup_simple("Widget").expect("Widget").is_visible());
    }

    #[tokio::test]
    async fn load_missing_file_is_io_error() {
        let err = DescriptorCatalog::load(Path::new("/nonexistent/components.json"), "p")
            .await
            .expect_err("missing file");
        assert!(matches!(err, AiaError::Io(_)));
    }
}
