//! Target Naming - `{width}x{height}/{artwork}.png`
//!
//! Pure; lets build tooling declare the output files before they exist.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::extract::IconRegion;

pub const RASTER_EXTENSION: &str = "png";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderTarget {
    /// Per-resolution subdirectory, e.g. `16x16`
    pub resolution_dir: String,
    pub file_name: String,
    /// Relative to the output root
    pub output_path: String,
}

impl RenderTarget {
    pub fn for_region(region: &IconRegion, artwork_name: &str) -> Self {
        let resolution_dir = format!(
            "{}x{}",
            format_dimension(region.width),
            format_dimension(region.height)
        );
        let file_name = format!("{}.{}", artwork_name, RASTER_EXTENSION);
        let output_path = format!("{}/{}", resolution_dir, file_name);
        Self {
            resolution_dir,
            file_name,
            output_path,
        }
    }

    pub fn resolve(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.resolution_dir).join(&self.file_name)
    }
}

pub fn names_for(regions: &[IconRegion], artwork_name: &str) -> Vec<RenderTarget> {
    regions
        .iter()
        .map(|region| RenderTarget::for_region(region, artwork_name))
        .collect()
}

/// Shortest decimal form: `16.0` -> `16`, `16.5` -> `16.5`
pub fn format_dimension(value: f64) -> String {
    format!("{}", value)
}
