//! In-memory project model produced by [`AiaReader`](crate::AiaReader).
//!
//! The model is built once per archive read and treated as read-only by
//! consumers afterwards.

use serde::Serialize;

use super::asset::Asset;
use super::component::Component;
use super::descriptor::{simple_type_name, Descriptor};
use crate::blocks::BlockStats;

/// Name of the app's entry screen; it is always listed first.
pub const MAIN_SCREEN: &str = "Screen1";

/// One `key=value` line of `project.properties`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectProperty {
    pub name: String,
    pub value: String,
}

/// A third-party component type shipped inside the archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Fully-qualified type declared by the build info, e.g. `com.example.MyExt`.
    pub name: String,
    /// Descriptor read from the archive's `component(s).json`.
    #[serde(rename = "descriptorJSON")]
    pub descriptor: Descriptor,
}

impl Extension {
    /// Type name as it appears in a scheme's `$Type` field.
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.name)
    }
}

/// A screen: its component tree plus the raw block XML.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Screen {
    pub name: String,
    /// Root component of the screen.
    pub form: Component,
    /// Block XML exactly as stored in the `.bky` file.
    pub blocks: String,
}

impl Screen {
    /// Counts over this screen's blocks. Parses the XML on every call.
    pub fn block_stats(&self) -> BlockStats {
        BlockStats::from_xml(&self.blocks)
    }
}

/// A parsed `.aia` project.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    /// [`MAIN_SCREEN`] first, then the remaining screens in discovery order.
    pub screens: Vec<Screen>,
    pub extensions: Vec<Extension>,
    pub assets: Vec<Asset>,
    /// Lines of `project.properties`, in file order.
    pub properties: Vec<ProjectProperty>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            screens: Vec::new(),
            extensions: Vec::new(),
            assets: Vec::new(),
            properties: Vec::new(),
        }
    }

    /// Adds a screen, keeping [`MAIN_SCREEN`] at the front.
    pub(crate) fn add_screen(&mut self, screen: Screen) {
        if screen.name == MAIN_SCREEN {
            self.screens.insert(0, screen);
        } else {
            self.screens.push(screen);
        }
    }

    pub fn screen(&self, name: &str) -> Option<&Screen> {
        self.screens.iter().find(|s| s.name == name)
    }

    pub fn main_screen(&self) -> Option<&Screen> {
        self.screen(MAIN_SCREEN)
    }

    pub fn extension(&self, name: &str) -> Option<&Extension> {
        self.extensions.iter().find(|e| e.name == name)
    }

    pub fn asset(&self, name: &str) -> Option<&Asset> {
        self.assets.iter().find(|a| a.name == name)
    }

    /// Value of a `project.properties` key. The last occurrence wins.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties
            .iter()
            .rev()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }

    /// Package derived from the `main` property by dropping its class name:
    /// `appinventor.ai_jane.MyApp.Screen1` becomes `appinventor.ai_jane.MyApp`.
    pub fn package_name(&self) -> Option<String> {
        let main = self.property("main")?;
        let (package, _class) = main.rsplit_once('.')?;
        Some(package.to_string())
    }
}
