//! Reading `.aia` archives.
//!
//! An `.aia` file is a zip with this layout:
//!
//! ```text
//! youngandroidproject/project.properties
//! src/appinventor/<user>/<project>/Screen1.scm   component tree (JSON)
//! src/appinventor/<user>/<project>/Screen1.bky   blocks (XML)
//! assets/<file>                                  media
//! assets/external_comps/<ext>/...                extensions
//! ```

pub mod entries;
pub mod project_properties;
pub mod reader;
pub mod scheme;

pub use reader::AiaReader;

/// Path of the mandatory project properties entry.
pub const PROJECT_PROPERTIES: &str = "youngandroidproject/project.properties";
