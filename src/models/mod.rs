//! Project model types.
//!
//! - [`project`]   : [`Project`], [`Screen`], [`Extension`] and project-level properties
//! - [`component`] : the per-screen component tree
//! - [`descriptor`]: component type descriptors (catalog and extension format)
//! - [`asset`]     : binary assets with lazily issued access URLs

pub mod asset;
pub mod component;
pub mod descriptor;
pub mod project;

pub use asset::Asset;
pub use component::{Component, ComponentIter, Origin, Property, ROOT_UID};
pub use descriptor::{simple_type_name, DeclaredProperty, Descriptor};
pub use project::{Extension, Project, ProjectProperty, Screen, MAIN_SCREEN};
