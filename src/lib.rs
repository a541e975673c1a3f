//! IconPlate Core - Icon Plate Renderer
//!
//! # Conventions
//! 1. The first root layer labelled `artwork:<name>` is the icon
//! 2. Its first nested layer is the plate
//! 3. Every rectangle on the plate is one output size
//! 4. Output lands in `OUT_DIR/{width}x{height}/<name>.png`
//! 5. Regions are handed to the rasterizer with a top-left origin

pub mod config;
pub mod document;
pub mod extract;
pub mod hashing;
pub mod output;
pub mod pipeline;
pub mod raster;
pub mod targets;

pub use config::{ConfigError, RasterizerConfig, RenderConfig};
pub use document::{ParseError, SvgDocument};
pub use extract::{extract, Artwork, DocumentSize, IconRegion, ARTWORK_PREFIX};
pub use hashing::{compute_report_hash, sha256_hex};
pub use output::{OutputFs, OutputPathError, StdFs};
pub use pipeline::{PipelineError, RegionOutcome, RenderPipeline, RenderReport};
pub use raster::{CommandRasterizer, RasterDispatcher, RasterError, RasterRequest, Rasterizer};
pub use targets::{names_for, RenderTarget};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
