//! Render Configuration
//!
//! Loaded from JSON; every field has a default so an empty object is valid.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const RASTERIZER_ENV: &str = "ICONPLATE_RASTERIZER";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    #[serde(default)]
    pub rasterizer: RasterizerConfig,
    /// Resolution folders created in every output root up front
    #[serde(default = "default_conventional_dirs")]
    pub conventional_dirs: Vec<String>,
}

/// External rasterizer invocation.
///
/// Regions use a top-left origin. Placeholders in `args`: `{source}`,
/// `{output}`, `{x}`, `{y}`, `{negX}`, `{negY}`, `{width}`, `{height}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterizerConfig {
    #[serde(default = "default_program")]
    pub program: String,
    #[serde(default = "default_args")]
    pub args: Vec<String>,
}

fn default_program() -> String {
    "rsvg-convert".to_string()
}

fn default_args() -> Vec<String> {
    [
        "--page-width={width}",
        "--page-height={height}",
        "--left={negX}",
        "--top={negY}",
        "--format=png",
        "--output={output}",
        "{source}",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_conventional_dirs() -> Vec<String> {
    ["16x16", "22x22", "24x24", "32x32", "48x48"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for RasterizerConfig {
    fn default() -> Self {
        Self {
            program: default_program(),
            args: default_args(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            rasterizer: RasterizerConfig::default(),
            conventional_dirs: default_conventional_dirs(),
        }
    }
}

impl RenderConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `ICONPLATE_RASTERIZER`, if set and non-empty
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(program) = std::env::var(RASTERIZER_ENV) {
            if !program.trim().is_empty() {
                self.rasterizer.program = program;
            }
        }
        self
    }
}
