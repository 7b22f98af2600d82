//! Merges a component's saved properties with its descriptor.
//!
//! AIA schemes only store properties whose value differs from the default.
//! [`reconcile`] expands that sparse set into the full, descriptor-ordered
//! property list a viewer displays.

use std::collections::HashMap;

use crate::models::{DeclaredProperty, Property};

/// Saved property overrides of one component, keyed by property name.
pub type SavedProperties = HashMap<String, String>;

/// Produces one [`Property`] per declared property, in declaration order.
///
/// - Saved value present: `{ name, value }` with no editor type.
/// - Otherwise: `{ name, value: default, editor_type }` from the declaration.
///
/// Saved entries the descriptor does not declare are dropped.
pub fn reconcile(saved: &SavedProperties, declared: &[DeclaredProperty]) -> Vec<Property> {
    declared
        .iter()
        .map(|decl| match saved.get(&decl.name) {
            Some(value) => Property {
                name: decl.name.clone(),
                value: Some(value.clone()),
                editor_type: None,
            },
            None => Property {
                name: decl.name.clone(),
                value: decl.default_value.clone(),
                editor_type: decl.editor_type.clone(),
            },
        })
        .collect()
}
