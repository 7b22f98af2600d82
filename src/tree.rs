//! Builds a typed component tree from scheme JSON.
//!
//! Every node is resolved against a descriptor: an extension packaged in the
//! archive when the node's `$Type` matches one, otherwise the built-in
//! catalog. A node whose type resolves to nothing is kept in the tree with
//! `faulty = true` and no properties, and its children are still built.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::catalog::DescriptorCatalog;
use crate::models::{Component, Descriptor, Extension, Origin, ROOT_UID};
use crate::reconcile::{reconcile, SavedProperties};

/// Scheme keys that describe the node itself rather than a property.
pub const RESERVED_KEYS: [&str; 5] = ["$Name", "$Type", "$Version", "Uuid", "$Components"];

/// Builds component trees for one archive.
///
/// Holds only shared references, so one builder can serve every screen.
#[derive(Clone, Copy)]
pub struct ComponentBuilder<'a> {
    catalog: &'a DescriptorCatalog,
    extensions: &'a [Extension],
}

impl<'a> ComponentBuilder<'a> {
    pub fn new(catalog: &'a DescriptorCatalog, extensions: &'a [Extension]) -> Self {
        Self {
            catalog,
            extensions,
        }
    }

    /// Builds `node` and its `$Components`, recursively.
    pub fn build(&self, node: &Value) -> Component {
        let Some(obj) = node.as_object() else {
            warn!("scheme component is not a JSON object; marked faulty");
            return faulty_component("", "", ROOT_UID);
        };

        let name = string_field(obj, "$Name").unwrap_or_default();
        let component_type = string_field(obj, "$Type").unwrap_or_default();
        let uid = string_field(obj, "Uuid").unwrap_or_else(|| ROOT_UID.to_string());

        let (origin, descriptor) = self.resolve(&component_type);

        let mut component = Component {
            name,
            component_type,
            uid,
            origin,
            visible: true,
            faulty: false,
            properties: Vec::new(),
            children: Vec::new(),
        };

        match descriptor {
            Some(descriptor) => {
                component.visible = descriptor.is_visible();
                component.properties = reconcile(&saved_properties(obj), &descriptor.properties);
            }
            None => {
                warn!(
                    name = %component.name,
                    uid = %component.uid,
                    component_type = %component.component_type,
                    "no descriptor for component type; marked faulty"
                );
                component.faulty = true;
            }
        }

        if let Some(children) = obj.get("$Components").and_then(Value::as_array) {
            component.children = children.iter().map(|child| self.build(child)).collect();
        }

        component
    }

    /// Extension whose simple name matches `component_type`, else the catalog.
    fn resolve(&self, component_type: &str) -> (Origin, Option<&'a Descriptor>) {
        if let Some(ext) = self
            .extensions
            .iter()
            .find(|ext| ext.simple_name() == component_type)
        {
            return (Origin::Extension, Some(&ext.descriptor));
        }
        (
            Origin::BuiltIn,
            self.catalog.lookup_simple(component_type),
        )
    }
}

/// Collects the string-valued, non-reserved keys of a scheme node.
pub fn saved_properties(obj: &Map<String, Value>) -> SavedProperties {
    obj.iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(key, value)| match value {
            Value::String(s) => Some((key.clone(), s.clone())),
            other => {
                debug!(key = %key, value = %other, "non-string scheme value ignored");
                None
            }
        })
        .collect()
}

/// A childless, property-less faulty node.
pub(crate) fn faulty_component(name: &str, component_type: &str, uid: &str) -> Component {
    Component {
        name: name.to_string(),
        component_type: component_type.to_string(),
        uid: uid.to_string(),
        origin: Origin::BuiltIn,
        visible: true,
        faulty: true,
        properties: Vec::new(),
        children: Vec::new(),
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> DescriptorCatalog {
        DescriptorCatalog::from_json_str(
            r#"[
                {
                    "type": "rt.Form",
                    "properties": [
                        { "name": "Title", "editorType": "string", "defaultValue": "Screen1" },
                        { "name": "BackgroundColor", "editorType": "color", "defaultValue": "&HFFFFFFFF" }
                    ]
                },
                {
                    "type": "rt.Button",
                    "properties": [
                        { "name": "Text", "editorType": "textArea", "defaultValue": "Text for Button" }
                    ]
                },
                { "type": "rt.Clock", "nonVisible": "true", "properties": [] }
            ]"#,
            "rt",
        )
        .expect("catalog")
    }

    fn toaster() -> Extension {
        Extension {
            name: "com.example.Toaster".to_string(),
            descriptor: serde_json::from_value(json!({
                "type": "com.example.Toaster",
                "nonVisible": "true",
                "properties": [{ "name": "Message", "editorType": "string", "defaultValue": "hi" }]
            }))
            .expect("descriptor"),
        }
    }

    #[test]
    fn form_without_components_has_no_children() {
        let catalog = catalog();
        let builder = ComponentBuilder::new(&catalog, &[]);
        let form = builder.build(&json!({ "$Name": "Screen1", "$Type": "Form", "$Version": "31" }));
        assert_eq!(form.name, "Screen1");
        assert_eq!(form.uid, ROOT_UID);
        assert!(form.children.is_empty());
        assert!(!form.faulty);
        assert_eq!(form.properties.len(), 2);
    }

    #[test]
    fn children_are_built_in_archive_order() {
        let catalog = catalog();
        let builder = ComponentBuilder::new(&catalog, &[]);
        let form = builder.build(&json!({
            "$Name": "Screen1", "$Type": "Form", "Title": "Hello",
            "$Components": [
                { "$Name": "Button1", "$Type": "Button", "Uuid": "-101", "Text": "Go" },
                { "$Name": "Clock1", "$Type": "Clock", "Uuid": "202" }
            ]
        }));
        let names: Vec<&str> = form.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Button1", "Clock1"]);
        assert_eq!(form.children[0].uid, "-101");
        assert_eq!(
            form.children[0].property("Text").and_then(|p| p.value.as_deref()),
            Some("Go")
        );
        assert!(!form.children[1].visible);
        assert_eq!(form.property("Title").and_then(|p| p.value.as_deref()), Some("Hello"));
    }

    #[test]
    fn unknown_type_is_faulty_and_siblings_still_build() {
        let catalog = catalog();
        let builder = ComponentBuilder::new(&catalog, &[]);
        let form = builder.build(&json!({
            "$Name": "Screen1", "$Type": "Form",
            "$Components": [
                {
                    "$Name": "Gone1", "$Type": "RemovedThing", "Uuid": "1", "Foo": "bar",
                    "$Components": [{ "$Name": "Button1", "$Type": "Button", "Uuid": "2" }]
                },
                { "$Name": "Button2", "$Type": "Button", "Uuid": "3" }
            ]
        }));
        let gone = &form.children[0];
        assert!(gone.faulty);
        assert!(gone.properties.is_empty());
        assert_eq!(gone.children.len(), 1);
        assert!(!gone.children[0].faulty);
        assert!(!form.children[1].faulty);
    }

    #[test]
    fn extension_type_uses_archive_descriptor() {
        let catalog = catalog();
        let extensions = vec![toaster()];
        let builder = ComponentBuilder::new(&catalog, &extensions);
        let toast = builder.build(&json!({ "$Name": "Toaster1", "$Type": "Toaster", "Uuid": "9" }));
        assert_eq!(toast.origin, Origin::Extension);
        assert!(!toast.faulty);
        assert!(!toast.visible);
        assert_eq!(toast.properties[0].value.as_deref(), Some("hi"));
        assert_eq!(toast.properties[0].editor_type.as_deref(), Some("string"));
    }

    #[test]
    fn builtin_origin_for_catalog_types() {
        let catalog = catalog();
        let extensions = vec![toaster()];
        let builder = ComponentBuilder::new(&catalog, &extensions);
        let button = builder.build(&json!({ "$Name": "B", "$Type": "Button", "Uuid": "1" }));
        assert_eq!(button.origin, Origin::BuiltIn);
    }

    #[test]
    fn building_twice_is_structurally_equal() {
        let catalog = catalog();
        let builder = ComponentBuilder::new(&catalog, &[]);
        let scheme = json!({
            "$Name": "Screen1", "$Type": "Form",
            "$Components": [{ "$Name": "Button1", "$Type": "Button", "Uuid": "5", "Text": "x" }]
        });
        assert_eq!(builder.build(&scheme), builder.build(&scheme));
    }

    #[test]
    fn saved_properties_skip_reserved_and_non_string_keys() {
        let node = json!({
            "$Name": "B", "$Type": "Button", "$Version": "7", "Uuid": "1",
            "$Components": [], "Text": "Go", "Weird": 3
        });
        let saved = saved_properties(node.as_object().expect("object"));
        assert_eq!(saved.len(), 1);
        assert_eq!(saved.get("Text").map(String::as_str), Some("Go"));
    }

    #[test]
    fn non_object_node_is_faulty() {
        let catalog = catalog();
        let builder = ComponentBuilder::new(&catalog, &[]);
        assert!(builder.build(&json!("oops")).faulty);
    }
}
