//! Raster Dispatch
//!
//! One external rasterizer run per icon region, synchronous. Regions are
//! handed over with a top-left origin (no Y flip); the rasterizer argument
//! template decides how that maps onto its own flags.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::process::Command;
use thiserror::Error;

use crate::config::RasterizerConfig;
use crate::extract::{DocumentSize, IconRegion};
use crate::hashing::sha256_hex;
use crate::output::OutputFs;
use crate::targets::{format_dimension, RenderTarget};

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Region {width}x{height} truncates to an empty raster")]
    DegenerateRegion { width: f64, height: f64 },

    #[error("Region {width}x{height} is too large to rasterize")]
    OversizedRegion { width: f64, height: f64 },

    #[error("Cannot remove previous output {path}: {source}")]
    ClearOutput {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot run rasterizer '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Rasterizer '{program}' failed ({status}): {stderr}")]
    Failed {
        program: String,
        status: String,
        stderr: String,
    },

    #[error("Rasterizer reported success but wrote no file at {0}")]
    MissingOutput(PathBuf),
}

/// Pixel region handed to the rasterizer, top-left origin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterRequest {
    pub source: PathBuf,
    pub output: PathBuf,
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl RasterRequest {
    /// Width and height are truncated to whole pixels. Anything under one
    /// pixel is rejected rather than rounded up.
    pub fn new(source: &Path, output: PathBuf, region: &IconRegion) -> Result<Self, RasterError> {
        let width = region.width.trunc();
        let height = region.height.trunc();
        if width < 1.0 || height < 1.0 {
            return Err(RasterError::DegenerateRegion {
                width: region.width,
                height: region.height,
            });
        }
        if width > u32::MAX as f64 || height > u32::MAX as f64 {
            return Err(RasterError::OversizedRegion {
                width: region.width,
                height: region.height,
            });
        }
        if width != region.width || height != region.height {
            log::warn!(
                "region {}x{} is not a whole pixel size, rendering {}x{}",
                region.width,
                region.height,
                width,
                height
            );
        }

        Ok(Self {
            source: source.to_path_buf(),
            output,
            x: region.x,
            y: region.y,
            width: width as u32,
            height: height as u32,
        })
    }
}

/// Anything that can turn a request into a raster file on disk
pub trait Rasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<(), RasterError>;
}

/// Runs an external program built from an argument template
pub struct CommandRasterizer {
    config: RasterizerConfig,
}

impl CommandRasterizer {
    pub fn new(config: RasterizerConfig) -> Self {
        Self { config }
    }

    pub fn arguments(&self, request: &RasterRequest) -> Vec<String> {
        let lookup = |key: &str| match key {
            "source" => Some(request.source.display().to_string()),
            "output" => Some(request.output.display().to_string()),
            "x" => Some(format_dimension(request.x)),
            "y" => Some(format_dimension(request.y)),
            "negX" => Some(format_dimension(-request.x)),
            "negY" => Some(format_dimension(-request.y)),
            "width" => Some(request.width.to_string()),
            "height" => Some(request.height.to_string()),
            _ => None,
        };

        self.config
            .args
            .iter()
            .map(|arg| expand_placeholders(arg, &lookup))
            .collect()
    }
}

/// Replace `{key}` in one left-to-right pass; substituted text is never
/// rescanned. Unknown keys are kept verbatim.
fn expand_placeholders(template: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| Some((close, lookup(&after[..close])?))) {
            Some((close, value)) => {
                out.push_str(&value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

impl Rasterizer for CommandRasterizer {
    fn rasterize(&self, request: &RasterRequest) -> Result<(), RasterError> {
        let args = self.arguments(request);
        log::debug!("{} {}", self.config.program, args.join(" "));

        let output = Command::new(&self.config.program)
            .args(&args)
            .output()
            .map_err(|source| RasterError::Spawn {
                program: self.config.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(RasterError::Failed {
                program: self.config.program.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedFile {
    pub target: RenderTarget,
    pub sha256: String,
}

pub struct RasterDispatcher<'a> {
    fs: &'a dyn OutputFs,
    rasterizer: &'a dyn Rasterizer,
}

impl<'a> RasterDispatcher<'a> {
    pub fn new(fs: &'a dyn OutputFs, rasterizer: &'a dyn Rasterizer) -> Self {
        Self { fs, rasterizer }
    }

    /// Render one region into `out_dir/{w}x{h}/{artwork}.png`
    pub fn render(
        &self,
        document_path: &Path,
        out_dir: &Path,
        artwork_name: &str,
        region: &IconRegion,
        document_size: DocumentSize,
    ) -> Result<RenderedFile, RasterError> {
        let target = RenderTarget::for_region(region, artwork_name);

        if region.x < 0.0
            || region.y < 0.0
            || region.x + region.width > document_size.width
            || region.y + region.height > document_size.height
        {
            log::warn!(
                "{}: region at {},{} extends past the {}x{} canvas",
                target.output_path,
                region.x,
                region.y,
                document_size.width,
                document_size.height
            );
        }

        let output = target.resolve(out_dir);
        let request = RasterRequest::new(document_path, output.clone(), region)?;

        let dir = out_dir.join(&target.resolution_dir);
        self.fs
            .create_dir_all(&dir)
            .map_err(|source| RasterError::CreateDir {
                path: dir.clone(),
                source,
            })?;
        self.fs
            .remove_file(&output)
            .map_err(|source| RasterError::ClearOutput {
                path: output.clone(),
                source,
            })?;
        self.rasterizer.rasterize(&request)?;

        let data = self
            .fs
            .read(&output)
            .map_err(|_| RasterError::MissingOutput(output.clone()))?;

        log::info!("rendered {}", target.output_path);
        Ok(RenderedFile {
            target,
            sha256: sha256_hex(&data),
        })
    }
}
