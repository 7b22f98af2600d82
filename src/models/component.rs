//! Component tree nodes and their resolved properties.

use serde::Serialize;

/// Uid given to a screen's root Form, which carries no `Uuid` in the archive.
pub const ROOT_UID: &str = "0";

/// Where a component's type comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Origin {
    /// Type resolved through the bundled descriptor catalog.
    BuiltIn,
    /// Type supplied by an extension packaged inside the archive.
    Extension,
}

/// One property of a component after reconciliation against its descriptor.
///
/// `editor_type` is only present when the value was filled in from the
/// descriptor default; values read from the archive carry no editor hint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    /// Raw AIA string value (`"True"`, `"&HFF00FF00"`, `"14.0"`, ...).
    /// `None` when the property was neither saved nor given a default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub editor_type: Option<String>,
}

/// A node in a screen's component tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Component {
    /// User-assigned instance name, unique within the screen.
    pub name: String,
    /// Simple type name as written in `$Type` (e.g. `"Button"`).
    #[serde(rename = "type")]
    pub component_type: String,
    pub uid: String,
    pub origin: Origin,
    pub visible: bool,
    /// `true` when no descriptor could be found for this component's type.
    pub faulty: bool,
    pub properties: Vec<Property>,
    pub children: Vec<Component>,
}

impl Component {
    /// Looks up a resolved property by name.
    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Depth-first, pre-order traversal starting at (and including) `self`.
    pub fn iter(&self) -> ComponentIter<'_> {
        ComponentIter { stack: vec![self] }
    }

    /// Finds a component by instance name anywhere in this subtree.
    pub fn find(&self, name: &str) -> Option<&Component> {
        self.iter().find(|c| c.name == name)
    }

    /// Number of components in this subtree, including `self`.
    pub fn count(&self) -> usize {
        self.iter().count()
    }

    /// `true` when this node or any descendant is faulty.
    pub fn has_faults(&self) -> bool {
        self.iter().any(|c| c.faulty)
    }
}

/// Pre-order iterator over a component subtree. See [`Component::iter`].
pub struct ComponentIter<'a> {
    stack: Vec<&'a Component>,
}

impl<'a> Iterator for ComponentIter<'a> {
    type Item = &'a Component;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        // Reverse so the first child is visited next.
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}
