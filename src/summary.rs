//! Project-wide statistics for overview displays.
//!
//! [`ProjectSummary`] is computed from a read [`Project`] and serialized for
//! a UI shell; it holds no references into the project.

use serde::Serialize;

use crate::blocks::BlockCategoryCounts;
use crate::models::{Origin, Project};

/// Number of entries in [`ProjectSummary::top_component_types`].
pub const TOP_COMPONENT_TYPES: usize = 8;

const SIZE_UNITS: [&str; 6] = ["B", "kB", "MB", "GB", "TB", "PB"];

/// A name with a count, kept in a list to preserve ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// Overview statistics of one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub project_name: String,
    pub package_name: Option<String>,
    pub screen_count: usize,
    pub extension_count: usize,
    pub asset_count: usize,
    /// Sum of asset sizes in bytes.
    pub total_asset_size: u64,
    /// [`total_asset_size`](Self::total_asset_size) as text, e.g. `"12 kB"`.
    pub total_asset_size_text: String,
    /// Every `<block>` across all screens.
    pub total_blocks: usize,
    /// In screen order.
    pub blocks_per_screen: Vec<NamedCount>,
    /// Keyed by lower-cased file type, in first-seen order.
    pub assets_per_type: Vec<NamedCount>,
    /// Components across all screen trees, forms included.
    pub built_in_components: usize,
    pub extension_components: usize,
    pub block_categories: BlockCategoryCounts,
    /// Most used component types, count descending, ties in first-seen order.
    pub top_component_types: Vec<NamedCount>,
}

impl From<&Project> for ProjectSummary {
    fn from(p: &Project) -> Self {
        let mut total_blocks = 0;
        let mut blocks_per_screen = Vec::with_capacity(p.screens.len());
        let mut block_categories = BlockCategoryCounts::default();
        let mut built_in_components = 0;
        let mut extension_components = 0;
        let mut component_types: Vec<NamedCount> = Vec::new();

        for screen in &p.screens {
            let stats = screen.block_stats();
            total_blocks += stats.total_blocks;
            block_categories.accumulate(&stats.categories);
            blocks_per_screen.push(NamedCount {
                name: screen.name.clone(),
                count: stats.total_blocks,
            });

            for component in screen.form.iter() {
                match component.origin {
                    Origin::BuiltIn => built_in_components += 1,
                    Origin::Extension => extension_components += 1,
                }
                bump(&mut component_types, &component.component_type);
            }
        }

        let mut assets_per_type = Vec::new();
        for asset in &p.assets {
            bump(&mut assets_per_type, &asset.file_type.to_lowercase());
        }
        let total_asset_size = p.assets.iter().map(|a| a.size).sum();

        // Stable sort keeps first-seen order among equal counts.
        component_types.sort_by(|a, b| b.count.cmp(&a.count));
        component_types.truncate(TOP_COMPONENT_TYPES);

        Self {
            project_name: p.name.clone(),
            package_name: p.package_name(),
            screen_count: p.screens.len(),
            extension_count: p.extensions.len(),
            asset_count: p.assets.len(),
            total_asset_size,
            total_asset_size_text: format_size(total_asset_size),
            total_blocks,
            blocks_per_screen,
            assets_per_type,
            built_in_components,
            extension_components,
            block_categories,
            top_component_types: component_types,
        }
    }
}

fn bump(counts: &mut Vec<NamedCount>, name: &str) {
    match counts.iter_mut().find(|c| c.name == name) {
        Some(entry) => entry.count += 1,
        None => counts.push(NamedCount {
            name: name.to_string(),
            count: 1,
        }),
    }
}

/// Human-readable size with decimal units: `1500` becomes `"1 kB"`.
///
/// Divides by 1000 while the value exceeds 1000 and keeps the integer part.
pub fn format_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    let mut unit = 0;
    while size > 1000.0 && unit < SIZE_UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }
    format!("{} {}", size.trunc() as u64, SIZE_UNITS[unit])
}
