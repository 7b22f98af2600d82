//! Reader for App Inventor project archives (`.aia`).
//!
//! ```no_run
//! # async fn demo() -> Result<(), aia_kit::AiaError> {
//! let reader = aia_kit::AiaReader::with_bundled_catalog().await?;
//! let project = reader.read_file(std::path::Path::new("MyApp.aia")).await?;
//! for screen in &project.screens {
//!     println!("{}: {} components", screen.name, screen.form.count());
//! }
//! let summary = aia_kit::ProjectSummary::from(&project);
//! println!("{} blocks", summary.total_blocks);
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod assets;
pub mod blocks;
pub mod catalog;
pub mod config;
pub mod error;
pub mod extensions;
pub mod logging;
pub mod models;
pub mod reconcile;
pub mod summary;
pub mod tree;

pub use archive::AiaReader;
pub use assets::AssetUrlStore;
pub use blocks::{BlockCategory, BlockCategoryCounts, BlockStats};
pub use catalog::DescriptorCatalog;
pub use config::{LogConfig, ReaderConfig};
pub use error::AiaError;
pub use models::{
    Asset, Component, DeclaredProperty, Descriptor, Extension, Origin, Project, ProjectProperty,
    Property, Screen,
};
pub use summary::{format_size, ProjectSummary};
