//! Component type descriptors.
//!
//! A [`Descriptor`] is the complete, type-level description of a component:
//! every declared designer property with its default, plus the events,
//! methods and block properties the block editor consumes. The same shape is
//! used by the bundled catalog (`simple_components.json`) and by the
//! `component.json` / `components.json` files shipped with extensions.

use serde::{Deserialize, Deserializer, Serialize};

/// One designer property declared by a component type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclaredProperty {
    pub name: String,
    /// Editor widget hint, e.g. `"color"`, `"boolean"`, `"non_negative_float"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub editor_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

/// Full descriptor for one component type.
///
/// Only `type`, `nonVisible` and `properties` drive the pipeline. The
/// remaining well-known fields are kept for display, and anything else is
/// preserved verbatim in [`Descriptor::extra`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    /// Fully-qualified type, e.g. `com.google.appinventor.components.runtime.Button`.
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(default)]
    pub name: String,
    /// `"true"` for components that have no on-screen representation.
    #[serde(default = "default_non_visible", deserialize_with = "string_or_bool")]
    pub non_visible: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external: Option<String>,
    #[serde(default)]
    pub properties: Vec<DeclaredProperty>,
    #[serde(default)]
    pub block_properties: Vec<serde_json::Value>,
    #[serde(default)]
    pub events: Vec<serde_json::Value>,
    #[serde(default)]
    pub methods: Vec<serde_json::Value>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_non_visible() -> String {
    "false".to_string()
}

/// Accepts `"true"` / `"false"` as written by App Inventor, and tolerates a
/// bare JSON boolean from third-party extension builders.
fn string_or_bool<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Text(String),
        Bool(bool),
    }

    Ok(match Flag::deserialize(deserializer)? {
        Flag::Text(s) => s,
        Flag::Bool(b) => b.to_string(),
    })
}

impl Descriptor {
    /// `true` unless the descriptor declares `nonVisible: "true"`.
    pub fn is_visible(&self) -> bool {
        self.non_visible != "true"
    }

    /// Last dot-separated segment of [`Descriptor::type_name`].
    pub fn simple_name(&self) -> &str {
        simple_type_name(&self.type_name)
    }

    /// Looks up a declared property by name.
    pub fn declared_property(&self, name: &str) -> Option<&DeclaredProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Names of the events this type declares, in declaration order.
    pub fn event_names(&self) -> Vec<&str> {
        member_names(&self.events)
    }

    /// Names of the methods this type declares, in declaration order.
    pub fn method_names(&self) -> Vec<&str> {
        member_names(&self.methods)
    }
}

/// Returns the part of a dotted type name after the last `.`.
pub fn simple_type_name(type_name: &str) -> &str {
    type_name.rsplit('.').next().unwrap_or(type_name)
}

fn member_names(members: &[serde_json::Value]) -> Vec<&str> {
    members
        .iter()
        .filter_map(|m| m.get("name").and_then(|n| n.as_str()))
        .collect()
}
