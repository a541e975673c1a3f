//! Render Pipeline - Single Entry Point
//!
//! parse -> extract -> (target names | render each region).
//! The output root is validated before the source is even opened.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::config::{ConfigError, RenderConfig};
use crate::document::{ParseError, SvgDocument};
use crate::extract::{extract, Artwork};
use crate::hashing::compute_report_hash;
use crate::output::{validate_output_root, OutputFs, OutputPathError, StdFs};
use crate::raster::{CommandRasterizer, RasterDispatcher, Rasterizer};
use crate::targets::{names_for, RenderTarget};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error(transparent)]
    OutputPath(#[from] OutputPathError),

    #[error("Cannot create {path}: {source}")]
    PrepareDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RegionOutcome {
    Rendered { target: RenderTarget, sha256: String },
    Failed { target: RenderTarget, error: String },
}

impl RegionOutcome {
    pub fn target(&self) -> &RenderTarget {
        match self {
            Self::Rendered { target, .. } | Self::Failed { target, .. } => target,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    pub source: String,
    /// `None` when the document has no artwork/plate layer
    pub artwork: Option<String>,
    pub regions: Vec<RegionOutcome>,
    pub report_hash: String,
}

impl RenderReport {
    pub fn rendered_count(&self) -> usize {
        self.regions
            .iter()
            .filter(|r| matches!(r, RegionOutcome::Rendered { .. }))
            .count()
    }

    pub fn has_failures(&self) -> bool {
        self.regions
            .iter()
            .any(|r| matches!(r, RegionOutcome::Failed { .. }))
    }
}

pub struct RenderPipeline {
    config: RenderConfig,
    fs: Box<dyn OutputFs>,
    rasterizer: Box<dyn Rasterizer>,
}

impl RenderPipeline {
    /// Real file system and the configured external rasterizer
    pub fn new(config: RenderConfig) -> Self {
        let rasterizer = CommandRasterizer::new(config.rasterizer.clone());
        Self::with_backends(config, Box::new(StdFs), Box::new(rasterizer))
    }

    pub fn with_backends(
        config: RenderConfig,
        fs: Box<dyn OutputFs>,
        rasterizer: Box<dyn Rasterizer>,
    ) -> Self {
        Self {
            config,
            fs,
            rasterizer,
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Expected output files, without touching the output directory
    pub fn target_names(&self, source: &Path) -> Result<Vec<RenderTarget>, PipelineError> {
        Ok(match self.load_artwork(source)? {
            Some(artwork) => names_for(&artwork.regions, &artwork.name),
            None => vec![],
        })
    }

    /// Check the output root and create the conventional resolution folders
    pub fn prepare_output_root(&self, out_dir: &Path) -> Result<(), PipelineError> {
        validate_output_root(self.fs.as_ref(), out_dir)?;
        for name in &self.config.conventional_dirs {
            let path = out_dir.join(name);
            self.fs
                .create_dir_all(&path)
                .map_err(|source| PipelineError::PrepareDir { path, source })?;
        }
        Ok(())
    }

    /// Render every plate region of one document.
    ///
    /// Region failures are recorded in the report; only an invalid output
    /// root or an unparseable document is an `Err`.
    pub fn render(&self, source: &Path, out_dir: &Path) -> Result<RenderReport, PipelineError> {
        self.prepare_output_root(out_dir)?;
        self.render_document(source, out_dir)
    }

    /// Render several documents into one output root.
    ///
    /// The root is checked once; each document then succeeds or fails on
    /// its own.
    pub fn render_batch(
        &self,
        sources: &[PathBuf],
        out_dir: &Path,
    ) -> Result<Vec<Result<RenderReport, PipelineError>>, PipelineError> {
        self.prepare_output_root(out_dir)?;
        Ok(sources
            .iter()
            .map(|source| {
                let result = self.render_document(source, out_dir);
                if let Err(e) = &result {
                    log::error!("{}", e);
                }
                result
            })
            .collect())
    }

    fn load_artwork(&self, source: &Path) -> Result<Option<Artwork>, PipelineError> {
        let parse_error = |e| PipelineError::Parse {
            path: source.to_path_buf(),
            source: e,
        };
        let document = SvgDocument::load(source).map_err(parse_error)?;
        extract(&document).map_err(parse_error)
    }

    fn render_document(&self, source: &Path, out_dir: &Path) -> Result<RenderReport, PipelineError> {
        let artwork = self.load_artwork(source)?;

        let mut report = RenderReport {
            source: source.display().to_string(),
            artwork: artwork.as_ref().map(|a| a.name.clone()),
            regions: vec![],
            report_hash: String::new(),
        };

        if let Some(artwork) = &artwork {
            let dispatcher = RasterDispatcher::new(self.fs.as_ref(), self.rasterizer.as_ref());
            for region in &artwork.regions {
                let outcome = match dispatcher.render(source, out_dir, &artwork.name, region, artwork.size) {
                    Ok(file) => RegionOutcome::Rendered {
                        target: file.target,
                        sha256: file.sha256,
                    },
                    Err(e) => {
                        let target = RenderTarget::for_region(region, &artwork.name);
                        log::error!("{}: {}", target.output_path, e);
                        RegionOutcome::Failed {
                            target,
                            error: e.to_string(),
                        }
                    }
                };
                report.regions.push(outcome);
            }
        }

        report.report_hash = compute_report_hash(report.artwork.as_deref(), &report.regions);
        Ok(report)
    }
}

impl Default for RenderPipeline {
    fn default() -> Self {
        Self::new(RenderConfig::default())
    }
}
